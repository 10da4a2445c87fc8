//! A single session and its data bag.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use super::SessionId;
use crate::error::SessionError;
use crate::Result;

/// Per-client ephemeral state addressed by a [`SessionId`].
///
/// Sessions are only created by [`SessionManager`](super::SessionManager)
/// and handed out behind an `Arc`. The data bag has its own lock, so a
/// session can be shared across threads without outside synchronization.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    data: RwLock<HashMap<String, Value>>,
    created_at: Instant,
    last_activity: Mutex<Instant>,
}

impl Session {
    pub(crate) fn new(id: SessionId) -> Self {
        let now = Instant::now();
        Self {
            id,
            data: RwLock::new(HashMap::new()),
            created_at: now,
            last_activity: Mutex::new(now),
        }
    }

    /// The immutable identifier of this session.
    pub fn session_id(&self) -> &SessionId {
        &self.id
    }

    /// Bind `value` to `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let mut data = self.data.write().map_err(|_| SessionError::LockPoisoned)?;
        data.insert(key.into(), value.into());
        drop(data);

        self.touch();
        Ok(())
    }

    /// Get a copy of the value bound to `key`.
    pub fn get(&self, key: &str) -> Result<Value> {
        let data = self.data.read().map_err(|_| SessionError::LockPoisoned)?;
        let value = data
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::KeyNotFound {
                key: key.to_string(),
                session_id: self.id.to_string(),
            })?;
        drop(data);

        self.touch();
        Ok(value)
    }

    /// Remove the binding for `key`. Succeeds whether or not it existed.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut data = self.data.write().map_err(|_| SessionError::LockPoisoned)?;
        data.remove(key);
        drop(data);

        self.touch();
        Ok(())
    }

    /// Check if `key` is bound.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        let data = self.data.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(data.contains_key(key))
    }

    /// All bound keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let data = self.data.read().map_err(|_| SessionError::LockPoisoned)?;
        let mut keys: Vec<String> = data.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Check if the data bag is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the whole data bag into a JSON object.
    pub fn snapshot(&self) -> Result<Value> {
        let data = self.data.read().map_err(|_| SessionError::LockPoisoned)?;
        let map: Map<String, Value> = data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Value::Object(map))
    }

    /// Time when the session was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Time since the data bag was last read or written.
    pub fn idle_duration(&self) -> Duration {
        self.last_activity
            .lock()
            .map(|t| t.elapsed())
            .unwrap_or_default()
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_activity.lock() {
            *last = Instant::now();
        }
    }
}
