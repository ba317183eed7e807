use rocket::Route;

mod admin;
mod auth;
mod common;
mod profile;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(profile::routes());
    routes.extend(voting::routes());
    routes.extend(admin::routes());
    routes
}
