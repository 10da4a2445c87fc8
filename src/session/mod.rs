//! Session management module.
//!
//! This module provides the session registry, the per-session data bag,
//! and identifier generation from a secure random source.

mod id;
mod manager;
mod random;
#[allow(clippy::module_inception)]
mod session;

pub use id::{SessionId, DEFAULT_ID_BYTES, MIN_ID_BYTES};
pub use manager::{ManagerConfig, SessionManager, MAX_INITIAL_CAPACITY};
pub use random::{OsRandom, RandomSource};
pub use session::Session;
