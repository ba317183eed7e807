#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod matching;
pub mod model;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use logging::RequestLogger;

/// Assemble the server: all routes plus the config, database, and logging
/// fairings. Does not ignite or launch.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(RequestLogger)
}
