use crate::model::common::Role;

/// Marker types describing which role an [`super::AuthToken`] must carry to
/// pass a request guard.
pub trait Access {
    const ROLE: Role;
}

/// Endpoints open to registered event participants.
#[derive(Debug, Copy, Clone)]
pub struct ParticipantAuth;

impl Access for ParticipantAuth {
    const ROLE: Role = Role::Participant;
}

/// Endpoints restricted to event staff.
#[derive(Debug, Copy, Clone)]
pub struct AdminAuth;

impl Access for AdminAuth {
    const ROLE: Role = Role::Admin;
}
