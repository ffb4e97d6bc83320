//! Random passwords with a chosen mix of letters, digits, and symbols, drawn from a
//! cryptographically secure source.
//!
//! ```
//! # fn main() -> Result<(), pwgen::GenerateError> {
//! // 64 characters: 10 digits, 10 symbols, 44 letters of either case, no character twice.
//! let password = pwgen::generate(64, 10, 10, true, false)?;
//! assert_eq!(password.chars().count(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! Build a [`Generator`] to change the alphabets or the source of randomness, and accept a
//! [`PasswordGenerator`] where a [`MockPasswordGenerator`] should stand in during tests.

use std::sync::Arc;

mod alphabet;
mod config;
mod mock;
pub mod password_generation;
mod source;

pub use alphabet::{
    contains_digit, contains_lower, contains_symbol, contains_upper, Alphabet, DIGITS,
    LOWER_LETTERS, SYMBOLS, UPPER_LETTERS,
};
pub use config::GeneratorInput;
pub use mock::MockPasswordGenerator;
pub use password_generation::{Generator, PasswordGenerator, Policy};
pub use source::RandomSource;

/// Generate a password with the default alphabets; see [`PasswordGenerator::generate`].
pub fn generate(
    length: usize,
    num_digits: usize,
    num_symbols: usize,
    include_upper: bool,
    allow_repeat: bool,
) -> Result<String, GenerateError> {
    let gen = Generator::new(GeneratorInput::default())?;
    gen.generate(length, num_digits, num_symbols, include_upper, allow_repeat)
}

/// Generate a password with the default alphabets that satisfies `policy`; see
/// [`Generator::generate_with_policy`].
pub fn generate_with_policy(
    length: usize,
    num_digits: usize,
    num_symbols: usize,
    include_upper: bool,
    allow_repeat: bool,
    policy: Policy,
) -> Result<String, GenerateError> {
    let gen = Generator::new(GeneratorInput::default())?;
    gen.generate_with_policy(
        length,
        num_digits,
        num_symbols,
        include_upper,
        allow_repeat,
        policy,
    )
}

/// Like [`generate`], but panics on error.
pub fn must_generate(
    length: usize,
    num_digits: usize,
    num_symbols: usize,
    include_upper: bool,
    allow_repeat: bool,
) -> String {
    match generate(length, num_digits, num_symbols, include_upper, allow_repeat) {
        Ok(password) => password,
        Err(err) => panic!("{err}"),
    }
}

#[derive(Clone, Debug, thiserror::Error)]
#[error(transparent)]
pub struct GenerateError(GenerateErrorRepr);

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            GenerateErrorRepr::ExceedsTotalLength => ErrorKind::ExceedsTotalLength,
            GenerateErrorRepr::LettersExceedsAvailable => ErrorKind::LettersExceedsAvailable,
            GenerateErrorRepr::DigitsExceedsAvailable => ErrorKind::DigitsExceedsAvailable,
            GenerateErrorRepr::SymbolsExceedsAvailable => ErrorKind::SymbolsExceedsAvailable,
            GenerateErrorRepr::RandomSource(_) => ErrorKind::RandomSource,
            GenerateErrorRepr::PolicyUnsatisfiable { .. } => ErrorKind::PolicyUnsatisfiable,
        }
    }
}

impl From<GenerateErrorRepr> for GenerateError {
    fn from(err: GenerateErrorRepr) -> GenerateError {
        GenerateError(err)
    }
}

impl From<rand::Error> for GenerateError {
    fn from(err: rand::Error) -> GenerateError {
        GenerateError(GenerateErrorRepr::RandomSource(Arc::new(err)))
    }
}

/// An error of the given kind, mainly for handing to a [`MockPasswordGenerator`].
///
/// [`ErrorKind::PolicyUnsatisfiable`] reports zero attempts, and [`ErrorKind::RandomSource`] has
/// a placeholder cause.
impl From<ErrorKind> for GenerateError {
    fn from(kind: ErrorKind) -> GenerateError {
        let repr = match kind {
            ErrorKind::ExceedsTotalLength => GenerateErrorRepr::ExceedsTotalLength,
            ErrorKind::LettersExceedsAvailable => GenerateErrorRepr::LettersExceedsAvailable,
            ErrorKind::DigitsExceedsAvailable => GenerateErrorRepr::DigitsExceedsAvailable,
            ErrorKind::SymbolsExceedsAvailable => GenerateErrorRepr::SymbolsExceedsAvailable,
            ErrorKind::RandomSource => {
                return rand::Error::new("random source unavailable").into();
            }
            ErrorKind::PolicyUnsatisfiable => {
                GenerateErrorRepr::PolicyUnsatisfiable { attempts: 0 }
            }
        };
        GenerateError(repr)
    }
}

/// What went wrong while generating a password.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The digits and symbols asked for don't fit in the length.
    ExceedsTotalLength,
    /// More letters are needed than there are, and repeats aren't allowed.
    LettersExceedsAvailable,
    /// More digits are needed than there are, and repeats aren't allowed.
    DigitsExceedsAvailable,
    /// More symbols are needed than there are, and repeats aren't allowed.
    SymbolsExceedsAvailable,
    /// The random source failed.
    RandomSource,
    /// Too many passwords in a row failed the policy.
    PolicyUnsatisfiable,
}

#[derive(Clone, Debug, thiserror::Error)]
enum GenerateErrorRepr {
    #[error("number of digits and symbols must be less than total length")]
    ExceedsTotalLength,
    #[error("number of letters exceeds available letters and repeats are not allowed")]
    LettersExceedsAvailable,
    #[error("number of digits exceeds available digits and repeats are not allowed")]
    DigitsExceedsAvailable,
    #[error("number of symbols exceeds available symbols and repeats are not allowed")]
    SymbolsExceedsAvailable,
    #[error("failed to read from the random source: {0}")]
    RandomSource(#[source] Arc<rand::Error>),
    #[error("password policy was not satisfied after {attempts} attempts")]
    PolicyUnsatisfiable { attempts: u32 },
}
