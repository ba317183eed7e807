use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// Participant gender. Voting is only ever offered across genders within a slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The gender whose participants this gender may vote for.
    pub fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl From<Gender> for Bson {
    fn from(gender: Gender) -> Self {
        to_bson(&gender).expect("Serialisation is infallible")
    }
}
