use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::RandomSource;

/// Overrides for building a [`Generator`](crate::Generator).
///
/// Every field is optional; anything left out (or set to an empty string) uses the default. The
/// alphabets and the retry limit can be loaded from a config file, the random source can only be
/// set in code.
///
/// When repeats are disallowed, letters, digits, and symbols must not share characters: a digit
/// that was already placed as a letter can't be placed again, and generation fails once a class
/// runs out of characters that aren't in the password yet.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_letters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_letters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
    /// How many passwords `generate_with_policy` may reject before giving up. Unlimited if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_policy_attempts: Option<NonZeroU32>,
    /// Where randomness comes from. The operating system's secure source if unset.
    #[serde(skip)]
    pub source: Option<Arc<dyn RandomSource>>,
}

impl GeneratorInput {
    pub fn new() -> GeneratorInput {
        GeneratorInput::default()
    }

    pub fn lower_letters(mut self, chars: impl Into<String>) -> GeneratorInput {
        self.lower_letters = Some(chars.into());
        self
    }

    pub fn upper_letters(mut self, chars: impl Into<String>) -> GeneratorInput {
        self.upper_letters = Some(chars.into());
        self
    }

    pub fn digits(mut self, chars: impl Into<String>) -> GeneratorInput {
        self.digits = Some(chars.into());
        self
    }

    pub fn symbols(mut self, chars: impl Into<String>) -> GeneratorInput {
        self.symbols = Some(chars.into());
        self
    }

    pub fn max_policy_attempts(mut self, attempts: NonZeroU32) -> GeneratorInput {
        self.max_policy_attempts = Some(attempts);
        self
    }

    pub fn source(mut self, source: impl RandomSource + 'static) -> GeneratorInput {
        self.source = Some(Arc::new(source));
        self
    }
}

impl fmt::Debug for GeneratorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorInput")
            .field("lower_letters", &self.lower_letters)
            .field("upper_letters", &self.upper_letters)
            .field("digits", &self.digits)
            .field("symbols", &self.symbols)
            .field("max_policy_attempts", &self.max_policy_attempts)
            .field("source", &self.source.as_ref().map(|_| "custom"))
            .finish()
    }
}
