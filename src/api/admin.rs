use mongodb::{
    bson::{doc, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::admin::{EventStats, ParticipantSummary, SlotSettingsView},
        auth::{AdminAuth, AuthToken},
        common::{EventDay, EventTime, Gender, TimeSlot},
        db::{slot_settings::slot_filter, Account, Participant, TimeSlotSettings, Vote},
        mongodb::Coll,
    },
};

pub fn routes() -> Vec<Route> {
    routes![get_slots, toggle_voting, toggle_results, get_stats, get_profiles]
}

/// All 27 slot settings rows, in (day, time) order.
#[get("/admin/slots")]
async fn get_slots(
    _token: AuthToken<AdminAuth>,
    settings: Coll<TimeSlotSettings>,
) -> Result<Json<Vec<SlotSettingsView>>> {
    let ordered = FindOptions::builder()
        .sort(doc! { "day": 1, "time": 1 })
        .build();
    let slots: Vec<TimeSlotSettings> = settings.find(None, ordered).await?.try_collect().await?;
    Ok(Json(slots.into_iter().map(SlotSettingsView::from).collect()))
}

/// Flip the voting-open flag for one slot. Only this flag of this slot is
/// touched.
#[post("/admin/slots/<day>/<time>/voting")]
async fn toggle_voting(
    _token: AuthToken<AdminAuth>,
    day: EventDay,
    time: EventTime,
    settings: Coll<TimeSlotSettings>,
) -> Result<Json<SlotSettingsView>> {
    let toggled = toggle_flag(&settings, TimeSlot::new(day, time), GatingFlag::Voting).await?;
    Ok(Json(toggled.into()))
}

/// Flip the results-open flag for one slot. Independent of the voting flag:
/// results may open while voting is still open.
#[post("/admin/slots/<day>/<time>/results")]
async fn toggle_results(
    _token: AuthToken<AdminAuth>,
    day: EventDay,
    time: EventTime,
    settings: Coll<TimeSlotSettings>,
) -> Result<Json<SlotSettingsView>> {
    let toggled = toggle_flag(&settings, TimeSlot::new(day, time), GatingFlag::Results).await?;
    Ok(Json(toggled.into()))
}

/// The two per-slot gating flags an admin can toggle.
#[derive(Debug, Copy, Clone)]
enum GatingFlag {
    Voting,
    Results,
}

impl GatingFlag {
    fn field(self) -> &'static str {
        match self {
            Self::Voting => "voting_open",
            Self::Results => "results_open",
        }
    }

    fn read(self, settings: &TimeSlotSettings) -> bool {
        match self {
            Self::Voting => settings.voting_open,
            Self::Results => settings.results_open,
        }
    }
}

/// The update a toggle applies: flips only the named flag (plus the row
/// timestamp), leaving the other flag out of the document entirely.
fn toggle_update(flag: GatingFlag, current: &TimeSlotSettings) -> (bool, Document) {
    let new_value = !flag.read(current);
    let mut set = doc! { "updated_at": DateTime::now() };
    set.insert(flag.field(), new_value);
    (new_value, doc! { "$set": set })
}

/// Read-then-write toggle of a single boolean flag on a slot settings row.
/// Admin actions are rare enough that the read-modify-write race is a
/// non-issue; the row itself is updated atomically.
async fn toggle_flag(
    settings: &Coll<TimeSlotSettings>,
    slot: TimeSlot,
    flag: GatingFlag,
) -> Result<TimeSlotSettings> {
    let current = settings
        .find_one(slot_filter(slot), None)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Settings for slot {}", slot)))?;
    let (new_value, update) = toggle_update(flag, &current);
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = settings
        .find_one_and_update(slot_filter(slot), update, options)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Settings for slot {}", slot)))?;

    info!("Slot {} {} -> {}", slot, flag.field(), new_value);
    Ok(updated)
}

/// Aggregate statistics for the dashboard.
#[get("/admin/stats")]
async fn get_stats(
    _token: AuthToken<AdminAuth>,
    accounts: Coll<Account>,
    participants: Coll<Participant>,
    votes: Coll<Vote>,
) -> Result<Json<EventStats>> {
    let stats = EventStats {
        accounts: accounts.count_documents(None, None).await?,
        profiles: participants.count_documents(None, None).await?,
        votes: votes.count_documents(None, None).await?,
        male_profiles: participants
            .count_documents(doc! { "gender": Gender::Male }, None)
            .await?,
        female_profiles: participants
            .count_documents(doc! { "gender": Gender::Female }, None)
            .await?,
    };
    Ok(Json(stats))
}

/// The full profile roster, newest first.
#[get("/admin/profiles")]
async fn get_profiles(
    _token: AuthToken<AdminAuth>,
    participants: Coll<Participant>,
) -> Result<Json<Vec<ParticipantSummary>>> {
    let newest_first = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let profiles: Vec<Participant> = participants
        .find(None, newest_first)
        .await?
        .try_collect()
        .await?;
    Ok(Json(profiles.into_iter().map(ParticipantSummary::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_touches_only_its_flag() {
        let slot = TimeSlot::new(EventDay::Mon, EventTime::T1800);
        let mut current = TimeSlotSettings::example(slot);
        current.results_open = true;

        let (new_value, update) = toggle_update(GatingFlag::Voting, &current);
        assert!(new_value);
        let set = update.get_document("$set").unwrap();
        assert!(set.get_bool("voting_open").unwrap());
        assert!(!set.contains_key("results_open"));

        let (new_value, update) = toggle_update(GatingFlag::Results, &current);
        assert!(!new_value);
        let set = update.get_document("$set").unwrap();
        assert!(!set.get_bool("results_open").unwrap());
        assert!(!set.contains_key("voting_open"));
    }

    #[test]
    fn toggle_filter_pins_exactly_one_slot() {
        let mon_1800 = TimeSlot::new(EventDay::Mon, EventTime::T1800);
        let mon_1830 = TimeSlot::new(EventDay::Mon, EventTime::T1830);

        // Both day and time are pinned, so with the unique (day, time)
        // index the update can only ever hit the named row.
        let filter = slot_filter(mon_1800);
        assert!(filter.contains_key("day"));
        assert!(filter.contains_key("time"));
        assert_ne!(filter, slot_filter(mon_1830));
    }
}
