//! Random byte sources, and unbiased sampling on top of them.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// A source of cryptographically secure random bytes.
///
/// A [`Generator`](crate::Generator) reads its source through a shared reference, possibly from
/// several threads at once; implementations must be safe for concurrent reads. Failures are
/// reported to the caller of the generation as-is and are never retried.
pub trait RandomSource: Send + Sync {
    /// Fill all of `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// The operating system's secure random source. This is the default.
impl RandomSource for OsRng {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// Any cryptographically secure `rand` generator, shared behind a lock.
impl<R> RandomSource for Mutex<R>
where
    R: RngCore + CryptoRng + Send,
{
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        // An RNG has no invariant a panicking holder could break.
        let mut rng = self.lock().unwrap_or_else(PoisonError::into_inner);
        rng.try_fill_bytes(dest)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Arc<S> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        (**self).fill(dest)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &S {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        (**self).fill(dest)
    }
}

/// Draw an index uniformly from `0..n`.
///
/// Just enough big-endian bytes are read to cover `n - 1`, the unused high bits of the first byte
/// are masked off, and a value that still lands outside the range is discarded and redrawn. A
/// range with a single member is answered without reading anything.
pub(crate) fn uniform_index(source: &dyn RandomSource, n: usize) -> Result<usize, rand::Error> {
    debug_assert!(n > 0, "cannot sample from an empty range");
    let max = n.saturating_sub(1) as u64;
    if max == 0 {
        return Ok(0);
    }

    // Not `rand`'s range sampling: that pulls whole words from an `RngCore`, and passwords from
    // a given byte stream should come out the same as from other crypto/rand `Int` style
    // generators fed those bytes.
    let bits = u64::BITS - max.leading_zeros();
    let len = ((bits + 7) / 8) as usize;
    let mask = match bits % 8 {
        0 => u8::MAX,
        b => (1u8 << b) - 1,
    };

    let mut buf = [0u8; 8];
    loop {
        let bytes = &mut buf[..len];
        source.fill(bytes)?;
        bytes[0] &= mask;
        let value = bytes
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
        if value <= max {
            return Ok(value as usize);
        }
    }
}

/// Pick one character of `alphabet` uniformly. `alphabet` must not be empty.
pub(crate) fn random_element(
    source: &dyn RandomSource,
    alphabet: &[char],
) -> Result<char, rand::Error> {
    let idx = uniform_index(source, alphabet.len())?;
    Ok(alphabet[idx])
}

/// Insert `ch` at a uniformly chosen position of `s`, either end included.
pub(crate) fn random_insert(
    source: &dyn RandomSource,
    s: &mut Vec<char>,
    ch: char,
) -> Result<(), rand::Error> {
    if s.is_empty() {
        s.push(ch);
        return Ok(());
    }
    let pos = uniform_index(source, s.len() + 1)?;
    s.insert(pos, ch);
    Ok(())
}
