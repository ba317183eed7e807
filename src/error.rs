use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    /// No valid session accompanies the request.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    /// The caller is authenticated but has no saved participant profile.
    #[error("No profile saved for this account")]
    ProfileMissing,
    /// Any storage failure during match resolution. The resolver never
    /// returns partial results; the whole call aborts with this.
    #[error("Match lookup failed")]
    MatchLookupFailed(#[source] DbError),
    /// Any storage failure while replacing a voter's outgoing vote set.
    #[error("Vote submission failed")]
    VoteSubmissionFailed(#[source] DbError),
    /// Voting is not currently open for the caller's slot.
    #[error("Voting is closed for slot {0}")]
    VotingClosed(String),
    /// Results are not currently open for the caller's slot.
    #[error("Results are closed for slot {0}")]
    ResultsClosed(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        error!("{self}");
        Err(match self {
            Self::Db(_) | Self::MatchLookupFailed(_) | Self::VoteSubmissionFailed(_) => {
                Status::InternalServerError
            }
            Self::Unauthenticated(_) => Status::Unauthorized,
            Self::VotingClosed(_) | Self::ResultsClosed(_) => Status::Forbidden,
            Self::ProfileMissing | Self::NotFound(_) => Status::NotFound,
            Self::BadRequest(_) => Status::BadRequest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::local::blocking::Client;

    fn db_error() -> DbError {
        DbError::custom("connection reset")
    }

    fn status_of(error: Error) -> Status {
        // A bare rocket instance just to obtain a request to respond to.
        let client = Client::untracked(rocket::build()).unwrap();
        let request = client.get("/");
        error
            .respond_to(request.inner())
            .expect_err("errors always respond with a status")
    }

    #[test]
    fn storage_failures_are_internal_errors() {
        assert_eq!(status_of(Error::Db(db_error())), Status::InternalServerError);
        assert_eq!(
            status_of(Error::MatchLookupFailed(db_error())),
            Status::InternalServerError
        );
        assert_eq!(
            status_of(Error::VoteSubmissionFailed(db_error())),
            Status::InternalServerError
        );
    }

    #[test]
    fn missing_profile_is_not_found() {
        assert_eq!(status_of(Error::ProfileMissing), Status::NotFound);
        assert_eq!(
            status_of(Error::NotFound("thing".to_string())),
            Status::NotFound
        );
    }

    #[test]
    fn auth_and_gating_statuses() {
        assert_eq!(
            status_of(Error::Unauthenticated("no session".to_string())),
            Status::Unauthorized
        );
        assert_eq!(
            status_of(Error::VotingClosed("mon 18:00".to_string())),
            Status::Forbidden
        );
        assert_eq!(
            status_of(Error::ResultsClosed("mon 18:00".to_string())),
            Status::Forbidden
        );
        assert_eq!(
            status_of(Error::BadRequest("bad".to_string())),
            Status::BadRequest
        );
    }
}
