use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{
        common::{EventDay, EventTime, Gender},
        db::{Participant, Vote},
        mongodb::Id,
    },
};

/// A full vote submission: the complete set of targets the caller is
/// interested in. Replaces any previous submission wholesale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoteRequest {
    pub targets: Vec<Id>,
}

impl VoteRequest {
    /// Validate the submission against the caller's profile and the target
    /// profiles looked up from storage. Targets must be distinct, not the
    /// caller, and every one must be an opposite-gender participant in the
    /// caller's slot. An empty submission is valid and clears the caller's
    /// votes.
    pub fn validated_targets(&self, caller: &Participant, found: &[Participant]) -> Result<Vec<Id>> {
        let distinct: HashSet<Id> = self.targets.iter().copied().collect();
        if distinct.len() != self.targets.len() {
            return Err(Error::BadRequest("Duplicate vote targets".to_string()));
        }
        if distinct.contains(&caller.id) {
            return Err(Error::BadRequest("Cannot vote for yourself".to_string()));
        }

        for id in &self.targets {
            let target = found
                .iter()
                .find(|candidate| candidate.id == *id)
                .ok_or_else(|| Error::NotFound(format!("Participant with ID {}", id)))?;
            if target.slot() != caller.slot() || target.gender != caller.gender.opposite() {
                return Err(Error::BadRequest(format!(
                    "Participant {} is not a valid choice for this caller",
                    id
                )));
            }
        }

        Ok(self.targets.clone())
    }
}

/// A participant the caller may vote for, as offered by the candidate list.
/// Only seat and gender are shown before a match; contact details are not.
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateView {
    pub id: Id,
    pub seat_number: u32,
    pub gender: Gender,
}

impl From<Participant> for CandidateView {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            seat_number: participant.seat_number,
            gender: participant.gender,
        }
    }
}

/// A mutually matched participant, including their contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPeer {
    pub participant_id: Id,
    pub seat_number: u32,
    pub gender: Gender,
    pub day: EventDay,
    pub time: EventTime,
    pub phone_number: String,
}

impl From<Participant> for MatchedPeer {
    fn from(participant: Participant) -> Self {
        Self {
            participant_id: participant.id,
            seat_number: participant.participant.seat_number,
            gender: participant.participant.gender,
            day: participant.participant.day,
            time: participant.participant.time,
            phone_number: participant.participant.phone_number,
        }
    }
}

/// The caller's current outgoing votes.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteView {
    pub target: Id,
    pub cast_at: DateTime<Utc>,
}

impl From<Vote> for VoteView {
    fn from(vote: Vote) -> Self {
        Self {
            target: vote.vote.target,
            cast_at: vote.vote.cast_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::common::EventTime;

    #[test]
    fn valid_submission_passes() {
        let caller = Participant::example();
        let a = Participant::example_female();
        let b = Participant::example_female();
        let request = VoteRequest {
            targets: vec![a.id, b.id],
        };

        let targets = request
            .validated_targets(&caller, &[a.clone(), b.clone()])
            .unwrap();
        assert_eq!(targets, vec![a.id, b.id]);
    }

    #[test]
    fn empty_submission_is_valid() {
        let caller = Participant::example();
        let request = VoteRequest { targets: vec![] };
        assert!(request.validated_targets(&caller, &[]).unwrap().is_empty());
    }

    #[test]
    fn duplicates_rejected() {
        let caller = Participant::example();
        let a = Participant::example_female();
        let request = VoteRequest {
            targets: vec![a.id, a.id],
        };
        assert!(request.validated_targets(&caller, &[a]).is_err());
    }

    #[test]
    fn self_vote_rejected() {
        let caller = Participant::example();
        let request = VoteRequest {
            targets: vec![caller.id],
        };
        assert!(request.validated_targets(&caller, &[caller.clone()]).is_err());
    }

    #[test]
    fn same_gender_target_rejected() {
        let caller = Participant::example();
        let other = Participant::example(); // Same gender, same slot.
        let request = VoteRequest {
            targets: vec![other.id],
        };
        assert!(request.validated_targets(&caller, &[other]).is_err());
    }

    #[test]
    fn cross_slot_target_rejected() {
        let caller = Participant::example();
        let mut other = Participant::example_female();
        other.time = EventTime::T1930;
        let request = VoteRequest {
            targets: vec![other.id],
        };
        assert!(request.validated_targets(&caller, &[other]).is_err());
    }

    #[test]
    fn matched_peer_exposes_contact_details() {
        let participant = Participant::example_female();
        let peer = MatchedPeer::from(participant.clone());

        assert_eq!(peer.participant_id, participant.id);
        assert_eq!(peer.seat_number, participant.seat_number);
        assert_eq!(peer.gender, participant.gender);
        assert_eq!(peer.day, participant.day);
        assert_eq!(peer.time, participant.time);
        assert_eq!(peer.phone_number, participant.phone_number);
    }

    #[test]
    fn unknown_target_rejected() {
        let caller = Participant::example();
        let request = VoteRequest {
            targets: vec![Id::new()],
        };
        assert!(request.validated_targets(&caller, &[]).is_err());
    }
}
