use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{EventDay, EventTime, Gender, TimeSlot},
    mongodb::Id,
};

/// Core participation profile data, as stored in the database.
///
/// Profiles are immutable once saved; there is deliberately no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCore {
    /// The owning account. Unique: one profile per account.
    pub account_id: Id,
    pub student_id: String,
    pub day: EventDay,
    pub time: EventTime,
    pub gender: Gender,
    /// Seat within the slot. Not unique across genders.
    pub seat_number: u32,
    /// Contact phone in E.164 form, revealed only to mutual matches.
    pub phone_number: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ParticipantCore {
    /// The (day, time) slot this participant registered into.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.day, self.time)
    }
}

/// A participant without an ID.
pub type NewParticipant = ParticipantCore;

/// A participant from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub participant: ParticipantCore,
}

impl Deref for Participant {
    type Target = ParticipantCore;

    fn deref(&self) -> &Self::Target {
        &self.participant
    }
}

impl DerefMut for Participant {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.participant
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ParticipantCore {
        pub fn example() -> Self {
            Self {
                account_id: Id::new(),
                student_id: "20211072".to_string(),
                day: EventDay::Mon,
                time: EventTime::T1800,
                gender: Gender::Male,
                seat_number: 1,
                phone_number: "+821012345678".to_string(),
                created_at: Utc::now(),
            }
        }

        pub fn example_female() -> Self {
            Self {
                student_id: "20211073".to_string(),
                gender: Gender::Female,
                ..Self::example()
            }
        }
    }

    impl Participant {
        pub fn example() -> Self {
            Self {
                id: Id::new(),
                participant: ParticipantCore::example(),
            }
        }

        pub fn example_female() -> Self {
            Self {
                id: Id::new(),
                participant: ParticipantCore::example_female(),
            }
        }
    }
}
