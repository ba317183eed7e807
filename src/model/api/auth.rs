use argon2::Config;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{common::Role, db::NewAccount};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A participant sign-in request: student ID only, auto-signup on first use.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionRequest {
    pub student_id: String,
}

impl SessionRequest {
    /// The trimmed student ID, or `None` if it is effectively empty.
    pub fn student_id(&self) -> Option<&str> {
        let trimmed = self.student_id.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Response to a participant sign-in, telling the client whether a profile
/// still needs to be captured.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// True iff the account was created by this request.
    pub new_account: bool,
}

/// Raw admin credentials, received from a user. These are never stored
/// directly, since the password is in plaintext.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub student_id: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for NewAccount {
    type Error = ();

    /// Convert [`AdminCredentials`] to a new admin [`NewAccount`] by hashing
    /// the password. This enforces that the ID is non-empty and the password
    /// meets the minimum length.
    fn try_from(cred: AdminCredentials) -> Result<Self, Self::Error> {
        if cred.student_id.is_empty() || cred.password.len() < MIN_PASSWORD_LENGTH {
            return Err(());
        }

        // 16 bytes of salt is the recommendation for argon2:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default()).unwrap(); // Safe because the default `Config` is valid.
        Ok(Self {
            student_id: cred.student_id,
            role: Role::Admin,
            password_hash: Some(password_hash),
            created_at: Utc::now(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_round_trip() {
        let cred = AdminCredentials::example();
        let account: NewAccount = cred.clone().try_into().unwrap();

        assert_eq!(account.role, Role::Admin);
        assert!(account.verify_password(&cred.password));
        assert!(!account.verify_password("wrong password"));
    }

    #[test]
    fn weak_credentials_rejected() {
        assert!(NewAccount::try_from(AdminCredentials::empty()).is_err());
        assert!(NewAccount::try_from(AdminCredentials {
            student_id: "staff".into(),
            password: "short".into(),
        })
        .is_err());
    }

    #[test]
    fn student_id_is_trimmed() {
        let request = SessionRequest {
            student_id: "  20211072 ".into(),
        };
        assert_eq!(request.student_id(), Some("20211072"));

        let blank = SessionRequest {
            student_id: "   ".into(),
        };
        assert_eq!(blank.student_id(), None);
    }
}
