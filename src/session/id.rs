//! Session identifier type.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::RandomSource;
use crate::error::SessionError;
use crate::Result;

/// Number of random bytes drawn for a session identifier.
pub const DEFAULT_ID_BYTES: usize = 64;

/// Smallest identifier size accepted by [`ManagerConfig`](super::ManagerConfig).
pub const MIN_ID_BYTES: usize = 16;

/// Opaque identifier for a session.
///
/// Identifiers are random bytes from a [`RandomSource`], hex-encoded in
/// lowercase. With the default 64 bytes that is 128 characters and 512 bits
/// of entropy, so collisions are not checked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Draw `len` bytes from `source` and hex-encode them.
    ///
    /// Fails with [`SessionError::IdentifierGeneration`] if the source errors
    /// or returns fewer than `len` bytes.
    pub fn generate<R: RandomSource + ?Sized>(source: &R, len: usize) -> Result<Self> {
        let mut bytes = vec![0u8; len];
        let n = source
            .fill(&mut bytes)
            .map_err(|e| SessionError::IdentifierGeneration(e.to_string()))?;

        if n != len {
            return Err(SessionError::IdentifierGeneration(format!(
                "short read: {} of {} bytes",
                n, len
            )));
        }

        Ok(Self(hex::encode(bytes)))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the identifier, for log lines.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        &self.0[..end]
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    /// Accepts a non-empty, even-length, lowercase hex string.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let well_formed = !s.is_empty()
            && s.len() % 2 == 0
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(SessionError::InvalidSessionId(s.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::OsRandom;
    use std::collections::HashSet;
    use std::io;

    struct Fixed(u8);

    impl RandomSource for Fixed {
        fn fill(&self, dest: &mut [u8]) -> io::Result<usize> {
            dest.fill(self.0);
            Ok(dest.len())
        }
    }

    struct Short;

    impl RandomSource for Short {
        fn fill(&self, dest: &mut [u8]) -> io::Result<usize> {
            Ok(dest.len() / 2)
        }
    }

    struct Broken;

    impl RandomSource for Broken {
        fn fill(&self, _dest: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("entropy pool unavailable"))
        }
    }

    #[test]
    fn test_default_length_and_charset() {
        let id = SessionId::generate(&OsRandom, DEFAULT_ID_BYTES).unwrap();
        assert_eq!(id.as_str().len(), 128);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            let id = SessionId::generate(&OsRandom, DEFAULT_ID_BYTES).unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {}", id);
        }
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_hex_encoding_is_lowercase() {
        let id = SessionId::generate(&Fixed(0xAB), 4).unwrap();
        assert_eq!(id.as_str(), "abababab");
    }

    #[test]
    fn test_short_read_fails() {
        let err = SessionId::generate(&Short, DEFAULT_ID_BYTES).unwrap_err();
        assert!(matches!(err, SessionError::IdentifierGeneration(_)));
        assert!(err.to_string().contains("32 of 64"));
    }

    #[test]
    fn test_source_error_fails() {
        let err = SessionId::generate(&Broken, DEFAULT_ID_BYTES).unwrap_err();
        assert!(matches!(err, SessionError::IdentifierGeneration(_)));
        assert!(err.to_string().contains("entropy pool unavailable"));
    }

    #[test]
    fn test_short_prefix() {
        let id = SessionId::generate(&Fixed(0x01), 8).unwrap();
        assert_eq!(id.short(), "01010101");

        let tiny: SessionId = "ab".parse().unwrap();
        assert_eq!(tiny.short(), "ab");
    }

    #[test]
    fn test_parse_valid() {
        let id: SessionId = "00ff".parse().unwrap();
        assert_eq!(id.as_str(), "00ff");
    }

    #[test]
    fn test_parse_invalid() {
        // Empty
        assert!("".parse::<SessionId>().is_err());

        // Odd length
        assert!("abc".parse::<SessionId>().is_err());

        // Uppercase
        assert!("ABCD".parse::<SessionId>().is_err());

        // Not hex
        assert!(matches!(
            "nonexistent-id".parse::<SessionId>(),
            Err(SessionError::InvalidSessionId(ref s)) if s == "nonexistent-id"
        ));
    }

    #[test]
    fn test_roundtrip() {
        let original = SessionId::generate(&OsRandom, DEFAULT_ID_BYTES).unwrap();
        let parsed: SessionId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_borrow_lookup() {
        let id: SessionId = "beef".parse().unwrap();
        let mut set = HashSet::new();
        set.insert(id);
        assert!(set.contains("beef"));
        assert!(!set.contains("cafe"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id: SessionId = "c0ffee".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c0ffee\"");
    }
}
