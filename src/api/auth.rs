use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::auth::{AdminCredentials, SessionRequest, SessionResponse},
        auth::{AdminAuth, AuthToken, ParticipantAuth, AUTH_TOKEN_COOKIE},
        common::Role,
        db::{Account, AccountCore, NewAccount},
        mongodb::{Coll, Id},
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![session, admin_authenticate, logout]
}

/// Participant entry: sign in by student ID, creating the account on first
/// use. The response tells the client whether a profile still needs to be
/// captured.
#[post("/auth/session", data = "<request>", format = "json")]
async fn session(
    cookies: &CookieJar<'_>,
    request: Json<SessionRequest>,
    accounts: Coll<Account>,
    new_accounts: Coll<NewAccount>,
    config: &State<Config>,
) -> Result<Json<SessionResponse>> {
    let student_id = request
        .student_id()
        .ok_or_else(|| Error::BadRequest("Student ID must not be empty".to_string()))?;

    let with_student_id = doc! {
        "student_id": student_id,
    };

    let (account, new_account) = match accounts.find_one(with_student_id, None).await? {
        Some(account) => {
            // Admin accounts hold a password and must use the admin login.
            if account.role == Role::Admin {
                return Err(Error::Unauthenticated(
                    "This account requires password sign-in".to_string(),
                ));
            }
            (account, false)
        }
        None => {
            let new_id: Id = new_accounts
                .insert_one(AccountCore::participant(student_id.to_string()), None)
                .await?
                .inserted_id
                .as_object_id()
                .unwrap() // Safe because the ID comes directly from the database.
                .into();
            let account = accounts.find_one(new_id.as_doc(), None).await?.unwrap();
            (account, true)
        }
    };

    let token = AuthToken::<ParticipantAuth>::for_account(&account);
    cookies.add(token.into_cookie(config));

    Ok(Json(SessionResponse { new_account }))
}

/// Staff entry: student ID plus password, verified against the account's
/// argon2 hash.
#[post("/auth/admin", data = "<credentials>", format = "json")]
async fn admin_authenticate(
    cookies: &CookieJar<'_>,
    credentials: Json<AdminCredentials>,
    accounts: Coll<Account>,
    config: &State<Config>,
) -> Result<()> {
    let with_student_id = doc! {
        "student_id": &credentials.student_id,
        "role": Role::Admin,
    };

    let admin = accounts
        .find_one(with_student_id, None)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::Unauthenticated(
                "No admin found with the provided ID and password combination".to_string(),
            )
        })?;

    let token = AuthToken::<AdminAuth>::for_account(&admin);
    cookies.add(token.into_cookie(config));

    Ok(())
}

#[delete("/auth")]
fn logout(cookies: &CookieJar<'_>) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}
