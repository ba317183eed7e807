//! Plain value types shared between the API and DB layers.

mod gender;
pub use gender::Gender;

mod role;
pub use role::Role;

mod slot;
pub use slot::{EventDay, EventTime, InvalidSlot, TimeSlot};
