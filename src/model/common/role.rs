use std::fmt::Display;

use mongodb::bson::{to_bson, Bson};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// The role attribute carried by every account. Admin membership is data,
/// not a hardcoded identity list.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Role {
    Participant = 0,
    Admin = 1,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Participant => "participant",
            Self::Admin => "admin",
        })
    }
}

impl From<Role> for Bson {
    fn from(role: Role) -> Self {
        to_bson(&role).expect("Serialisation is infallible")
    }
}
