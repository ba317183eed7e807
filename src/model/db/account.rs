use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{
        api::auth::AdminCredentials,
        common::Role,
        mongodb::{Coll, Id},
    },
    Config,
};

/// Core account data, as stored in the database.
///
/// Participants are created with just their student ID; admin accounts
/// additionally carry an argon2 password hash.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCore {
    pub student_id: String,
    pub role: Role,
    pub password_hash: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl AccountCore {
    /// Create a participant account for the given student ID.
    pub fn participant(student_id: String) -> Self {
        Self {
            student_id,
            role: Role::Participant,
            password_hash: None,
            created_at: Utc::now(),
        }
    }

    /// Check whether the given password is correct.
    /// Always false for accounts without a password (participants).
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        match &self.password_hash {
            // A malformed hash encoding fails verification.
            Some(hash) => argon2::verify_encoded(hash, password.as_ref()).unwrap_or(false),
            None => false,
        }
    }
}

/// An account without an ID.
pub type NewAccount = AccountCore;

/// An account from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub account: AccountCore,
}

impl Deref for Account {
    type Target = AccountCore;

    fn deref(&self) -> &Self::Target {
        &self.account
    }
}

impl DerefMut for Account {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.account
    }
}

/// Ensure at least one admin-role account exists, creating the bootstrap
/// admin from config if necessary. Idempotent.
pub async fn ensure_admin_account_exists(
    accounts: &Coll<Account>,
    new_accounts: &Coll<NewAccount>,
    config: &Config,
) -> Result<()> {
    let with_admin_role = doc! {
        "role": Role::Admin,
    };
    if accounts.find_one(with_admin_role, None).await?.is_some() {
        return Ok(());
    }

    let credentials = AdminCredentials {
        student_id: config.admin_username().to_string(),
        password: config.admin_password().to_string(),
    };
    let admin: NewAccount = credentials
        .try_into()
        .map_err(|_| Error::BadRequest("Illegal bootstrap admin credentials".to_string()))?;
    new_accounts.insert_one(admin, None).await?;
    info!("Created bootstrap admin account");
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl AccountCore {
        pub fn example() -> Self {
            Self::participant("20211072".to_string())
        }

        pub fn example_admin() -> Self {
            AdminCredentials::example()
                .try_into()
                .expect("example credentials are valid")
        }
    }
}
