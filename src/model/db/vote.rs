use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A directed interest edge between two participants, as stored in the
/// database. A voter's full outgoing set is replaced atomically on every
/// submission; individual edges are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub voter: Id,
    pub target: Id,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub cast_at: DateTime<Utc>,
}

impl VoteCore {
    pub fn new(voter: Id, target: Id) -> Self {
        Self {
            voter,
            target,
            cast_at: Utc::now(),
        }
    }

    /// Build the voter's new outgoing set for a submission. The result is
    /// derived from the submitted targets alone; whatever the voter held
    /// before plays no part. An empty submission yields an empty set,
    /// clearing the voter's votes.
    pub fn replacement_set(voter: Id, targets: Vec<Id>) -> Vec<Self> {
        targets
            .into_iter()
            .map(|target| Self::new(voter, target))
            .collect()
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

impl DerefMut for Vote {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vote
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Vote {
        pub fn example(voter: Id, target: Id) -> Self {
            Self {
                id: Id::new(),
                vote: VoteCore::new(voter, target),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets_of(votes: &[NewVote]) -> Vec<Id> {
        votes.iter().map(|vote| vote.target).collect()
    }

    #[test]
    fn submission_replaces_the_whole_set() {
        let voter = Id::new();
        let (x, y, z) = (Id::new(), Id::new(), Id::new());

        let first = NewVote::replacement_set(voter, vec![x, y]);
        assert_eq!(targets_of(&first), vec![x, y]);

        // A later submission carries nothing over from the first.
        let second = NewVote::replacement_set(voter, vec![z]);
        assert_eq!(targets_of(&second), vec![z]);
        assert!(second.iter().all(|vote| vote.voter == voter));
    }

    #[test]
    fn empty_submission_clears_the_set() {
        assert!(NewVote::replacement_set(Id::new(), Vec::new()).is_empty());
    }
}
