use std::marker::PhantomData;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{
    errors::Error as JwtError, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{self, FromRequest},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::model::{common::Role, db::Account, mongodb::Id};
use crate::Config;

use super::user::Access;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// The caller's session: a signed token naming an account and its role,
/// passed explicitly into every operation that needs an identity.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken<A> {
    id: Id,
    #[serde(rename = "rol")]
    role: Role,
    #[serde(skip)]
    phantom: PhantomData<A>,
}

impl<A> AuthToken<A> {
    /// Get the account ID.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the account's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Does this token permit the given role's endpoints?
    pub fn permits(&self, target: Role) -> bool {
        self.role == target
    }
}

impl<A> AuthToken<A>
where
    A: Access,
{
    /// Create a token for the given account. The role claim comes from the
    /// account record, not the marker type; the guard checks they agree.
    pub fn for_account(account: &Account) -> Self {
        Self {
            id: account.id,
            role: account.role,
            phantom: PhantomData,
        }
    }

    /// Serialise this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap(); // Infallible with the default header.

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(time::Duration::seconds(config.auth_ttl().num_seconds()))
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialise a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self, JwtError> {
        jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims<A>>| claims.claims.token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims<A> {
    #[serde(flatten, bound = "")]
    token: AuthToken<A>,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r, A> FromRequest<'r> for AuthToken<A>
where
    A: Access,
{
    type Error = ();

    /// Extract a token from the auth cookie and verify that it carries the
    /// role this endpoint requires. No valid cookie means 401; a valid
    /// cookie with the wrong role means 403.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let config = req.guard::<&State<Config>>().await.unwrap(); // `Config` is always managed.

        let cookie = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => return request::Outcome::Failure((Status::Unauthorized, ())),
        };
        let token: Self = match Self::from_cookie(cookie, config) {
            Ok(token) => token,
            Err(_) => return request::Outcome::Failure((Status::Unauthorized, ())),
        };

        if token.permits(A::ROLE) {
            request::Outcome::Success(token)
        } else {
            request::Outcome::Failure((Status::Forbidden, ()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{
        auth::{AdminAuth, ParticipantAuth},
        db::AccountCore,
    };

    fn account(core: AccountCore) -> Account {
        Account {
            id: Id::new(),
            account: core,
        }
    }

    #[test]
    fn cookie_round_trip() {
        let config = Config::example();
        let account = account(AccountCore::example());

        let token = AuthToken::<ParticipantAuth>::for_account(&account);
        let cookie = token.into_cookie(&config);
        let decoded = AuthToken::<ParticipantAuth>::from_cookie(&cookie, &config).unwrap();

        assert_eq!(decoded.id(), account.id);
        assert_eq!(decoded.role(), Role::Participant);
    }

    #[test]
    fn wrong_secret_rejected() {
        let config = Config::example();
        let other = Config::example_other_secret();
        let account = account(AccountCore::example());

        let cookie = AuthToken::<ParticipantAuth>::for_account(&account).into_cookie(&config);
        assert!(AuthToken::<ParticipantAuth>::from_cookie(&cookie, &other).is_err());
    }

    #[test]
    fn role_claim_tracks_the_account() {
        let participant = account(AccountCore::example());
        let admin = account(AccountCore::example_admin());

        let token = AuthToken::<ParticipantAuth>::for_account(&participant);
        assert!(token.permits(Role::Participant));
        assert!(!token.permits(Role::Admin));

        let token = AuthToken::<AdminAuth>::for_account(&admin);
        assert!(token.permits(Role::Admin));
        assert!(!token.permits(Role::Participant));
    }
}
