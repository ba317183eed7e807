use chrono::{DateTime, Utc};
use phonenumber::{country, Mode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{
        common::{EventDay, EventTime, Gender},
        db::{Account, NewParticipant, Participant},
        mongodb::Id,
    },
};

/// Seats are handed out per gender within a slot; real events use single
/// digits, but leave headroom.
pub const MAX_SEAT_NUMBER: u32 = 99;

/// A profile registration request. Saved profiles are immutable, so this is
/// only ever accepted once per account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileRequest {
    pub day: EventDay,
    pub time: EventTime,
    pub gender: Gender,
    pub seat_number: u32,
    pub phone_number: String,
}

impl ProfileRequest {
    /// Validate the request and build the participant record for the given
    /// account. The phone number is parsed (Korean numbering plan by
    /// default) and stored normalised to E.164.
    pub fn into_participant(self, account: &Account) -> Result<NewParticipant> {
        if self.seat_number == 0 || self.seat_number > MAX_SEAT_NUMBER {
            return Err(Error::BadRequest(format!(
                "Seat number out of range: {}",
                self.seat_number
            )));
        }

        let phone = phonenumber::parse(Some(country::KR), &self.phone_number)
            .map_err(|_| Error::BadRequest("Invalid phone number".to_string()))?;

        Ok(NewParticipant {
            account_id: account.id,
            student_id: account.student_id.clone(),
            day: self.day,
            time: self.time,
            gender: self.gender,
            seat_number: self.seat_number,
            phone_number: phone.format().mode(Mode::E164).to_string(),
            created_at: Utc::now(),
        })
    }
}

/// A participant's own profile, as returned to them.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: Id,
    pub student_id: String,
    pub day: EventDay,
    pub time: EventTime,
    pub gender: Gender,
    pub seat_number: u32,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Participant> for ProfileView {
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

#[cfg(test)]
mod examples {
    use super::*;

    impl ProfileRequest {
        pub fn example() -> Self {
            Self {
                day: EventDay::Mon,
                time: EventTime::T1800,
                gender: Gender::Male,
                seat_number: 1,
                phone_number: "010-1234-5678".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::db::AccountCore;

    fn account() -> Account {
        Account {
            id: Id::new(),
            account: AccountCore::example(),
        }
    }

    #[test]
    fn phone_is_normalised_to_e164() {
        let account = account();
        let participant = ProfileRequest::example().into_participant(&account).unwrap();

        assert_eq!(participant.phone_number, "+821012345678");
        assert_eq!(participant.account_id, account.id);
        assert_eq!(participant.student_id, account.student_id);
    }

    #[test]
    fn garbage_phone_rejected() {
        let request = ProfileRequest {
            phone_number: "not a number".into(),
            ..ProfileRequest::example()
        };
        assert!(request.into_participant(&account()).is_err());
    }

    #[test]
    fn seat_number_bounds() {
        for seat_number in [0, MAX_SEAT_NUMBER + 1] {
            let request = ProfileRequest {
                seat_number,
                ..ProfileRequest::example()
            };
            assert!(request.into_participant(&account()).is_err());
        }
    }
}
