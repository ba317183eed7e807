use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime};
use mongodb::error::Error as DbError;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{EventDay, EventTime, TimeSlot},
    mongodb::{Coll, Id},
};

/// Per-slot gating flags, as stored in the database. One row per valid
/// (day, time) pair; the two flags are fully independent of each other and
/// of every other slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotSettingsCore {
    pub day: EventDay,
    pub time: EventTime,
    pub voting_open: bool,
    pub results_open: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TimeSlotSettingsCore {
    /// Settings for a freshly created slot: both flags closed.
    pub fn closed(slot: TimeSlot) -> Self {
        Self {
            day: slot.day,
            time: slot.time,
            voting_open: false,
            results_open: false,
            updated_at: Utc::now(),
        }
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.day, self.time)
    }
}

/// Slot settings without an ID.
pub type NewTimeSlotSettings = TimeSlotSettingsCore;

/// Slot settings from the database, with their unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotSettings {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub settings: TimeSlotSettingsCore,
}

impl Deref for TimeSlotSettings {
    type Target = TimeSlotSettingsCore;

    fn deref(&self) -> &Self::Target {
        &self.settings
    }
}

impl DerefMut for TimeSlotSettings {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.settings
    }
}

/// A filter document matching the settings row for the given slot.
pub fn slot_filter(slot: TimeSlot) -> mongodb::bson::Document {
    doc! {
        "day": slot.day,
        "time": slot.time,
    }
}

/// Ensure a settings row exists for all 27 slots, creating missing ones
/// closed/closed. Idempotent; never touches existing rows.
pub async fn ensure_slot_settings_exist(
    settings: &Coll<TimeSlotSettings>,
    new_settings: &Coll<NewTimeSlotSettings>,
) -> Result<(), DbError> {
    for slot in TimeSlot::all() {
        if settings.find_one(slot_filter(slot), None).await?.is_none() {
            new_settings
                .insert_one(TimeSlotSettingsCore::closed(slot), None)
                .await?;
        }
    }
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl TimeSlotSettings {
        pub fn example(slot: TimeSlot) -> Self {
            Self {
                id: Id::new(),
                settings: TimeSlotSettingsCore::closed(slot),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slots_start_fully_closed() {
        for slot in TimeSlot::all() {
            let settings = TimeSlotSettingsCore::closed(slot);
            assert!(!settings.voting_open);
            assert!(!settings.results_open);
            assert_eq!(settings.slot(), slot);
        }
    }
}
