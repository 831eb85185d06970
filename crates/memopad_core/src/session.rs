//! Process-wide session context and guard.
//!
//! # Responsibility
//! - Hold the currently signed-in user as one explicit context object,
//!   refreshed on sign-in/sign-out events.
//! - Gate every fetcher/mutator call behind `require_user_id`.
//!
//! # Invariants
//! - Services never look up the user ad hoc; they receive `&SessionContext`.
//! - Auth protocol details (credentials, tokens, avatar storage) live
//!   outside this crate; only {user id, email, has-session} is consumed.

use crate::model::UserId;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identity snapshot of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
}

/// Session-layer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No live session; the caller must redirect to sign-in.
    NotAuthenticated,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no active session; sign in first"),
        }
    }
}

impl Error for SessionError {}

/// Current session state, owned by the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    current: Option<SessionUser>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session with a freshly authenticated user.
    pub fn sign_in(&mut self, user: SessionUser) {
        info!(
            "event=session_begin module=session status=ok user_id={}",
            user.user_id
        );
        self.current = Some(user);
    }

    /// Clears the session on sign-out or expiry.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.current.take() {
            info!(
                "event=session_end module=session status=ok user_id={}",
                user.user_id
            );
        }
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Session guard: resolves the owning user id or fails the operation
    /// before any store call is issued.
    pub fn require_user_id(&self) -> Result<UserId, SessionError> {
        self.current
            .as_ref()
            .map(|user| user.user_id)
            .ok_or(SessionError::NotAuthenticated)
    }
}
