//! # memsession
//!
//! In-process session store for request-handling layers.
//!
//! A [`SessionManager`] mints sessions with high-entropy identifiers and
//! resolves identifiers back to sessions. Each [`Session`] carries a
//! key-value bag of JSON values for per-client ephemeral state such as
//! authentication status or flash messages.
//!
//! ## Features
//!
//! - **Secure identifiers**: 64 random bytes from the OS CSPRNG, hex-encoded
//! - **Thread-safe**: registry and data bags are guarded internally
//! - **Pluggable randomness**: any [`RandomSource`] can back identifier generation
//! - **Lightweight**: no persistence, no background tasks
//!
//! ## Quick Start
//!
//! ```
//! use memsession::{SessionManager, Value};
//!
//! fn main() -> memsession::Result<()> {
//!     let manager = SessionManager::new();
//!
//!     let session = manager.new_session()?;
//!     session.set("user", "alice")?;
//!
//!     let same = manager.session(session.session_id().as_str())?;
//!     assert_eq!(same.get("user")?, Value::from("alice"));
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{Result, SessionError};
pub use serde_json::Value;
pub use session::{
    ManagerConfig, OsRandom, RandomSource, Session, SessionId, SessionManager, DEFAULT_ID_BYTES,
};
