//! Session registry and lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::{OsRandom, RandomSource, Session, SessionId, DEFAULT_ID_BYTES, MIN_ID_BYTES};
use crate::error::SessionError;
use crate::Result;

/// Largest registry capacity that may be reserved up front.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Configuration for a [`SessionManager`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Random bytes per identifier (the identifier is twice as many hex chars).
    pub id_bytes: usize,
    /// Registry capacity to reserve up front.
    pub initial_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            id_bytes: DEFAULT_ID_BYTES,
            initial_capacity: 0,
        }
    }
}

impl ManagerConfig {
    /// Check that identifiers carry enough entropy and the up-front
    /// reservation is bounded.
    pub fn validate(&self) -> Result<()> {
        if self.id_bytes < MIN_ID_BYTES {
            return Err(SessionError::InvalidConfig(format!(
                "id_bytes must be at least {}, got {}",
                MIN_ID_BYTES, self.id_bytes
            )));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(SessionError::InvalidConfig(format!(
                "initial_capacity must be at most {}, got {}",
                MAX_INITIAL_CAPACITY, self.initial_capacity
            )));
        }
        Ok(())
    }
}

/// Thread-safe registry of sessions.
///
/// The manager owns every session it creates. Callers receive `Arc` handles
/// that point at the same session the registry holds, so changes made
/// through one handle are visible through any later lookup.
pub struct SessionManager<R: RandomSource = OsRandom> {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    random: R,
    id_bytes: usize,
}

impl SessionManager<OsRandom> {
    /// Create a new empty manager backed by the OS random source.
    pub fn new() -> Self {
        Self::build(ManagerConfig::default(), OsRandom)
    }

    /// Create a new empty manager with the given configuration.
    ///
    /// Fails with [`SessionError::InvalidConfig`] if `config` does not pass
    /// [`ManagerConfig::validate`].
    pub fn with_config(config: ManagerConfig) -> Result<Self> {
        Self::with_random(config, OsRandom)
    }
}

impl<R: RandomSource> SessionManager<R> {
    /// Create a new empty manager drawing identifiers from `random`.
    pub fn with_random(config: ManagerConfig, random: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, random))
    }

    fn build(config: ManagerConfig, random: R) -> Self {
        Self {
            sessions: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            random,
            id_bytes: config.id_bytes,
        }
    }

    /// Create and register a new session with an empty data bag.
    pub fn new_session(&self) -> Result<Arc<Session>> {
        let id = SessionId::generate(&self.random, self.id_bytes).map_err(|e| {
            warn!("session identifier generation failed: {}", e);
            e
        })?;
        let session = Arc::new(Session::new(id.clone()));

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;

        sessions.insert(id.clone(), Arc::clone(&session));
        debug!(session = id.short(), total = sessions.len(), "session created");
        Ok(session)
    }

    /// Look up the session with the given ID.
    pub fn session(&self, id: &str) -> Result<Arc<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;

        sessions.get(id).cloned().ok_or_else(|| {
            debug!(session = short(id), "session lookup missed");
            SessionError::SessionNotFound(id.to_string())
        })
    }

    /// Check if a session exists.
    pub fn contains(&self, id: &str) -> Result<bool> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.contains_key(id))
    }

    /// Remove a session from the registry.
    ///
    /// Handles already held by callers stay usable, but the session can no
    /// longer be looked up.
    pub fn remove_session(&self, id: &str) -> Result<Arc<Session>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;

        let removed = sessions
            .remove(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        debug!(session = short(id), total = sessions.len(), "session removed");
        Ok(removed)
    }

    /// Get the number of sessions in the registry.
    pub fn count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// List all session IDs.
    pub fn list_ids(&self) -> Result<Vec<SessionId>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.keys().cloned().collect())
    }

    /// Random bytes drawn per identifier.
    pub fn id_bytes(&self) -> usize {
        self.id_bytes
    }
}

impl Default for SessionManager<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
