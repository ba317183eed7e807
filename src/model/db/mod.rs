//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g. IDs and
//! datetimes use MongoDB's own formats. Each entity comes as a `Core` struct
//! (alias `New*`) without an ID, plus an ID-carrying wrapper read back from
//! the database.

pub mod account;
pub use account::{ensure_admin_account_exists, Account, AccountCore, NewAccount};

pub mod participant;
pub use participant::{NewParticipant, Participant};

pub mod slot_settings;
pub use slot_settings::{ensure_slot_settings_exist, NewTimeSlotSettings, TimeSlotSettings};

pub mod vote;
pub use vote::{NewVote, Vote};
