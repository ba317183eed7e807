//! API-compatible (e.g. JSON de/serialisable) types.

pub mod admin;
pub mod auth;
pub mod profile;
pub mod vote;
