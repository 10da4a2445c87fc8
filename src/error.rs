//! Error types for memsession.

use thiserror::Error;

/// Main error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The secure random source could not supply enough bytes for an identifier.
    #[error("could not generate session identifier: {0}")]
    IdentifierGeneration(String),

    /// Session with the given ID was not found.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Key is not bound in the session's data bag.
    #[error("key {key:?} not found in session {session_id}")]
    KeyNotFound { key: String, session_id: String },

    /// String is not a well-formed session identifier.
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Manager configuration was rejected.
    #[error("invalid session manager configuration: {0}")]
    InvalidConfig(String),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

impl SessionError {
    /// Whether the caller can reasonably recover (fall back to a default,
    /// create a fresh session, and so on).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SessionError::SessionNotFound(_) | SessionError::KeyNotFound { .. }
        )
    }
}

/// Convenience Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
