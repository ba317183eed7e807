use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{EventDay, EventTime, Gender},
    db::{Participant, TimeSlotSettings},
    mongodb::Id,
};

/// One slot's gating flags, as shown on the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSettingsView {
    pub day: EventDay,
    pub time: EventTime,
    pub voting_open: bool,
    pub results_open: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<TimeSlotSettings> for SlotSettingsView {
    fn from(settings: TimeSlotSettings) -> Self {
        Self {
            day: settings.day,
            time: settings.time,
            voting_open: settings.voting_open,
            results_open: settings.results_open,
            updated_at: settings.updated_at,
        }
    }
}

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EventStats {
    pub accounts: u64,
    pub profiles: u64,
    pub votes: u64,
    pub male_profiles: u64,
    pub female_profiles: u64,
}

/// A profile row in the admin roster.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: Id,
    pub student_id: String,
    pub day: EventDay,
    pub time: EventTime,
    pub gender: Gender,
    pub seat_number: u32,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantSummary {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            student_id: participant.participant.student_id,
            day: participant.participant.day,
            time: participant.participant.time,
            gender: participant.participant.gender,
            seat_number: participant.participant.seat_number,
            phone_number: participant.participant.phone_number,
            created_at: participant.participant.created_at,
        }
    }
}
