//! Secure random byte sources used for identifier generation.

use std::io;

/// A source of cryptographically secure random bytes.
///
/// Implementations fill as much of `dest` as they can and return the number
/// of bytes written. Anything short of `dest.len()` is treated by callers as
/// a failure, as is an `Err`.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes, returning how many were written.
    fn fill(&self, dest: &mut [u8]) -> io::Result<usize>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> io::Result<usize> {
        getrandom::fill(dest).map_err(|e| io::Error::other(e.to_string()))?;
        Ok(dest.len())
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill(&self, dest: &mut [u8]) -> io::Result<usize> {
        (**self).fill(dest)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn fill(&self, dest: &mut [u8]) -> io::Result<usize> {
        (**self).fill(dest)
    }
}
