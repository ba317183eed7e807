use mongodb::bson::doc;

use crate::error::{Error, Result};
use crate::model::{
    auth::{Access, AuthToken},
    db::{slot_settings::slot_filter, Account, Participant, TimeSlotSettings},
    mongodb::Coll,
};

/// Look up the account behind a session token.
pub async fn account_by_token<A: Access>(
    token: &AuthToken<A>,
    accounts: &Coll<Account>,
) -> Result<Account> {
    accounts
        .find_one(token.id().as_doc(), None)
        .await?
        .ok_or_else(|| Error::Unauthenticated("No account behind this session".to_string()))
}

/// Look up the participant profile behind a session token, failing if the
/// caller has not saved one yet.
pub async fn profile_by_token<A: Access>(
    token: &AuthToken<A>,
    participants: &Coll<Participant>,
) -> Result<Participant> {
    participants
        .find_one(doc! { "account_id": token.id() }, None)
        .await?
        .ok_or(Error::ProfileMissing)
}

/// Look up the gating flags for the given participant's slot.
pub async fn settings_for(
    participant: &Participant,
    settings: &Coll<TimeSlotSettings>,
) -> Result<TimeSlotSettings> {
    let slot = participant.slot();
    settings
        .find_one(slot_filter(slot), None)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Settings for slot {}", slot)))
}
