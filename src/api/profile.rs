use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::profile::{ProfileRequest, ProfileView},
        auth::{AuthToken, ParticipantAuth},
        db::{Account, NewParticipant, Participant},
        mongodb::{Coll, Id},
    },
};

use super::common::{account_by_token, profile_by_token};

pub fn routes() -> Vec<Route> {
    routes![create_profile, get_profile]
}

/// Save the caller's participation profile. Profiles are immutable: a second
/// submission for the same account is rejected.
#[post("/profile", data = "<request>", format = "json")]
async fn create_profile(
    token: AuthToken<ParticipantAuth>,
    request: Json<ProfileRequest>,
    accounts: Coll<Account>,
    participants: Coll<Participant>,
    new_participants: Coll<NewParticipant>,
) -> Result<Json<ProfileView>> {
    let account = account_by_token(&token, &accounts).await?;

    let existing = participants
        .find_one(doc! { "account_id": token.id() }, None)
        .await?;
    if existing.is_some() {
        return Err(Error::BadRequest(
            "A profile is already saved for this account and cannot be changed".to_string(),
        ));
    }

    let participant = request.0.into_participant(&account)?;
    let new_id: Id = new_participants
        .insert_one(&participant, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Safe because the ID comes directly from the database.
        .into();
    let saved = participants.find_one(new_id.as_doc(), None).await?.unwrap();

    Ok(Json(saved.into()))
}

/// The caller's own profile.
#[get("/profile")]
async fn get_profile(
    token: AuthToken<ParticipantAuth>,
    participants: Coll<Participant>,
) -> Result<Json<ProfileView>> {
    let participant = profile_by_token(&token, &participants).await?;
    Ok(Json(participant.into()))
}
