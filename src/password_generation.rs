//! Generating passwords with a fixed mix of letters, digits, and symbols.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use rand::rngs::OsRng;
use tracing::{debug, instrument, trace, warn};

use crate::alphabet::{self, Alphabet};
use crate::source::{random_element, random_insert};
use crate::{GenerateError, GenerateErrorRepr, GeneratorInput, RandomSource};

/// Something that can produce passwords.
///
/// Depend on this rather than on [`Generator`] where tests need predictable passwords; see
/// [`MockPasswordGenerator`](crate::MockPasswordGenerator).
pub trait PasswordGenerator {
    /// Generate a password `length` characters long, holding exactly `num_digits` digits and
    /// `num_symbols` symbols, with letters making up the rest. Uppercase letters are only used
    /// if `include_upper` is set, and no character appears twice unless `allow_repeat` is.
    fn generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
    ) -> Result<String, GenerateError>;

    /// Like [`generate`](Self::generate), but panics on error.
    fn must_generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
    ) -> String {
        match self.generate(length, num_digits, num_symbols, include_upper, allow_repeat) {
            Ok(password) => password,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`generate`](Self::generate), but keeps generating until the result satisfies
    /// `policy`.
    fn generate_with_policy(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
        policy: Policy,
    ) -> Result<String, GenerateError>;
}

/// Character classes a password must contain at least one of.
///
/// The policy is only checked after generating; it is up to the caller to ask for a composition
/// that can satisfy it. Requiring a symbol with `num_symbols == 0`, for instance, never succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    pub needs_lower: bool,
    pub needs_upper: bool,
    pub needs_digit: bool,
    pub needs_symbol: bool,
}

impl Policy {
    /// Requires nothing.
    pub fn none() -> Policy {
        Policy::default()
    }

    /// Requires one of every class.
    pub fn all() -> Policy {
        Policy {
            needs_lower: true,
            needs_upper: true,
            needs_digit: true,
            needs_symbol: true,
        }
    }

    pub fn lower(mut self, needed: bool) -> Policy {
        self.needs_lower = needed;
        self
    }

    pub fn upper(mut self, needed: bool) -> Policy {
        self.needs_upper = needed;
        self
    }

    pub fn digit(mut self, needed: bool) -> Policy {
        self.needs_digit = needed;
        self
    }

    pub fn symbol(mut self, needed: bool) -> Policy {
        self.needs_symbol = needed;
        self
    }

    pub fn is_satisfied_by(&self, password: &str) -> bool {
        (!self.needs_lower || alphabet::contains_lower(password))
            && (!self.needs_upper || alphabet::contains_upper(password))
            && (!self.needs_digit || alphabet::contains_digit(password))
            && (!self.needs_symbol || alphabet::contains_symbol(password))
    }
}

/// A password generator with a particular set of alphabets and source of randomness.
///
/// A `Generator` never changes after it is built, so one can be shared by any number of threads
/// as long as its random source tolerates concurrent reads (the default one does).
#[derive(Clone)]
pub struct Generator {
    lower_letters: Alphabet,
    upper_letters: Alphabet,
    digits: Alphabet,
    symbols: Alphabet,
    /// Lowercase then uppercase, for when uppercase is included.
    letters: Alphabet,
    max_policy_attempts: Option<NonZeroU32>,
    source: Arc<dyn RandomSource>,
}

impl Generator {
    /// Build a generator from the given overrides.
    ///
    /// This can't currently fail, but may start rejecting some inputs in the future.
    pub fn new(input: GeneratorInput) -> Result<Generator, GenerateError> {
        Ok(Generator::from_input(input))
    }

    fn from_input(input: GeneratorInput) -> Generator {
        let lower_letters =
            Alphabet::or_default(input.lower_letters.as_deref(), alphabet::LOWER_LETTERS);
        let upper_letters =
            Alphabet::or_default(input.upper_letters.as_deref(), alphabet::UPPER_LETTERS);
        let digits = Alphabet::or_default(input.digits.as_deref(), alphabet::DIGITS);
        let symbols = Alphabet::or_default(input.symbols.as_deref(), alphabet::SYMBOLS);
        let letters = lower_letters.extended_with(&upper_letters);
        let source = input
            .source
            .unwrap_or_else(|| Arc::new(OsRng) as Arc<dyn RandomSource>);
        trace!(
            lower_letters = lower_letters.len(),
            upper_letters = upper_letters.len(),
            digits = digits.len(),
            symbols = symbols.len(),
            max_policy_attempts = input.max_policy_attempts.map(NonZeroU32::get),
            "built password generator"
        );
        Generator {
            lower_letters,
            upper_letters,
            digits,
            symbols,
            letters,
            max_policy_attempts: input.max_policy_attempts,
            source,
        }
    }

    pub fn lower_letters(&self) -> &Alphabet {
        &self.lower_letters
    }

    pub fn upper_letters(&self) -> &Alphabet {
        &self.upper_letters
    }

    pub fn digits(&self) -> &Alphabet {
        &self.digits
    }

    pub fn symbols(&self) -> &Alphabet {
        &self.symbols
    }

    /// Generate a password; see [`PasswordGenerator::generate`].
    ///
    /// Letters are placed first, then digits, then symbols, each at a random position among the
    /// characters placed so far, so no class ends up bunched at either end. Every requested count
    /// is checked against what's available before any randomness is used.
    pub fn generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
    ) -> Result<String, GenerateError> {
        let letters = if include_upper {
            &self.letters
        } else {
            &self.lower_letters
        };

        let num_letters = num_digits
            .checked_add(num_symbols)
            .and_then(|n| length.checked_sub(n))
            .ok_or(GenerateErrorRepr::ExceedsTotalLength)?;

        if !allow_repeat {
            if num_letters > letters.len() {
                return Err(GenerateErrorRepr::LettersExceedsAvailable.into());
            }
            if num_digits > self.digits.len() {
                return Err(GenerateErrorRepr::DigitsExceedsAvailable.into());
            }
            if num_symbols > self.symbols.len() {
                return Err(GenerateErrorRepr::SymbolsExceedsAvailable.into());
            }
        }

        let mut password = Vec::new();
        let phases = [
            (letters, num_letters, GenerateErrorRepr::LettersExceedsAvailable),
            (&self.digits, num_digits, GenerateErrorRepr::DigitsExceedsAvailable),
            (&self.symbols, num_symbols, GenerateErrorRepr::SymbolsExceedsAvailable),
        ];
        for (alphabet, count, exhausted) in phases {
            self.place(&mut password, alphabet, count, allow_repeat, exhausted)?;
        }
        Ok(password.into_iter().collect())
    }

    /// Add `count` characters from `alphabet` to `password`, each at a fresh random position.
    fn place(
        &self,
        password: &mut Vec<char>,
        alphabet: &Alphabet,
        count: usize,
        allow_repeat: bool,
        exhausted: GenerateErrorRepr,
    ) -> Result<(), GenerateError> {
        if !allow_repeat {
            let unused = alphabet
                .as_slice()
                .iter()
                .filter(|ch| !password.contains(ch))
                .count();
            if unused < count {
                // Only when classes share characters.
                return Err(exhausted.into());
            }
        }

        let mut placed = 0;
        while placed < count {
            let ch = random_element(&*self.source, alphabet.as_slice())?;
            if !allow_repeat && password.contains(&ch) {
                trace!("discarding repeated character");
                continue;
            }
            random_insert(&*self.source, password, ch)?;
            placed += 1;
        }
        Ok(())
    }

    /// Like [`generate`](Self::generate), but panics on error.
    pub fn must_generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
    ) -> String {
        PasswordGenerator::must_generate(
            self,
            length,
            num_digits,
            num_symbols,
            include_upper,
            allow_repeat,
        )
    }

    /// Generate passwords until one satisfies `policy`.
    ///
    /// Errors from generating are returned straight away. A password that merely fails the
    /// policy is thrown away and a new one generated from scratch; with no
    /// [`max_policy_attempts`](GeneratorInput::max_policy_attempts) configured this repeats
    /// forever if the policy can't be met.
    #[instrument(skip(self), level = "debug")]
    pub fn generate_with_policy(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
        policy: Policy,
    ) -> Result<String, GenerateError> {
        let mut attempts: u32 = 0;
        loop {
            let password =
                self.generate(length, num_digits, num_symbols, include_upper, allow_repeat)?;
            if policy.is_satisfied_by(&password) {
                return Ok(password);
            }
            attempts = attempts.saturating_add(1);
            debug!(attempts, "password did not satisfy the policy, regenerating");
            if let Some(max) = self.max_policy_attempts {
                if attempts >= max.get() {
                    warn!(attempts, "giving up on satisfying the password policy");
                    return Err(GenerateErrorRepr::PolicyUnsatisfiable { attempts }.into());
                }
            }
        }
    }
}

impl Default for Generator {
    fn default() -> Generator {
        Generator::from_input(GeneratorInput::default())
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("lower_letters", &self.lower_letters.to_string())
            .field("upper_letters", &self.upper_letters.to_string())
            .field("digits", &self.digits.to_string())
            .field("symbols", &self.symbols.to_string())
            .field("max_policy_attempts", &self.max_policy_attempts)
            .finish_non_exhaustive()
    }
}

impl PasswordGenerator for Generator {
    fn generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
    ) -> Result<String, GenerateError> {
        Generator::generate(self, length, num_digits, num_symbols, include_upper, allow_repeat)
    }

    fn generate_with_policy(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        include_upper: bool,
        allow_repeat: bool,
        policy: Policy,
    ) -> Result<String, GenerateError> {
        Generator::generate_with_policy(
            self,
            length,
            num_digits,
            num_symbols,
            include_upper,
            allow_repeat,
            policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU8, Ordering};

    use super::*;
    use crate::ErrorKind;

    /// Counts up from one, a byte at a time.
    #[derive(Default)]
    struct Counter(AtomicU8);

    impl RandomSource for Counter {
        fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
            for byte in dest {
                *byte = self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            }
            Ok(())
        }
    }

    fn has_repeats(s: &str) -> bool {
        let mut seen = HashSet::new();
        !s.chars().all(|ch| seen.insert(ch))
    }

    #[test]
    fn composition_is_exact() {
        let gen = Generator::default();
        let password = gen.generate(40, 7, 5, true, false).unwrap();
        assert_eq!(password.chars().count(), 40);
        assert_eq!(password.chars().filter(|ch| gen.digits().contains(*ch)).count(), 7);
        assert_eq!(password.chars().filter(|ch| gen.symbols().contains(*ch)).count(), 5);
        assert_eq!(
            password.chars().filter(|ch| ch.is_ascii_alphabetic()).count(),
            28
        );
    }

    #[test]
    fn preconditions_are_checked_in_order() {
        let gen = Generator::default();
        let kind = |r: Result<String, GenerateError>| r.unwrap_err().kind();
        assert_eq!(kind(gen.generate(0, 1, 0, true, false)), ErrorKind::ExceedsTotalLength);
        assert_eq!(kind(gen.generate(0, 0, 1, true, false)), ErrorKind::ExceedsTotalLength);
        assert_eq!(
            kind(gen.generate(5, usize::MAX, 1, true, true)),
            ErrorKind::ExceedsTotalLength
        );
        assert_eq!(kind(gen.generate(27, 0, 0, false, false)), ErrorKind::LettersExceedsAvailable);
        assert_eq!(kind(gen.generate(52, 11, 0, true, false)), ErrorKind::DigitsExceedsAvailable);
        assert_eq!(kind(gen.generate(52, 0, 31, true, false)), ErrorKind::SymbolsExceedsAvailable);
    }

    #[test]
    fn whole_alphabets_can_be_used_up() {
        let gen = Generator::default();
        let password = gen.generate(92, 10, 30, true, false).unwrap();
        assert_eq!(password.chars().count(), 92);
        assert!(!has_repeats(&password));
    }

    #[test]
    fn empty_overrides_keep_alphabets_non_empty() {
        let gen = Generator::new(
            GeneratorInput::new()
                .lower_letters("")
                .upper_letters("")
                .digits("")
                .symbols(""),
        )
        .unwrap();
        assert_eq!(gen.lower_letters().to_string(), alphabet::LOWER_LETTERS);
        assert_eq!(gen.upper_letters().to_string(), alphabet::UPPER_LETTERS);
        assert_eq!(gen.digits().to_string(), alphabet::DIGITS);
        assert_eq!(gen.symbols().to_string(), alphabet::SYMBOLS);
        assert_eq!(gen.generate(8, 2, 2, true, true).unwrap().chars().count(), 8);
    }

    #[test]
    fn zero_length_is_empty() {
        assert_eq!(Generator::default().generate(0, 0, 0, true, false).unwrap(), "");
    }

    #[test]
    fn overlapping_classes_fail_instead_of_looping() {
        let gen = Generator::new(GeneratorInput::new().lower_letters("ab1").digits("1"))
            .unwrap();
        for _ in 0..100 {
            match gen.generate(3, 1, 0, false, false) {
                Ok(password) => assert!(!has_repeats(&password), "{password}"),
                Err(err) => assert_eq!(err.kind(), ErrorKind::DigitsExceedsAvailable),
            }
        }
    }

    #[test]
    fn counter_source_is_deterministic() {
        let gen = || Generator::new(GeneratorInput::new().source(Counter::default())).unwrap();
        let (a, b) = (gen(), gen());
        for _ in 0..50 {
            assert_eq!(
                a.generate(20, 4, 4, true, false).unwrap(),
                b.generate(20, 4, 4, true, false).unwrap()
            );
        }
    }

    #[test]
    fn policy_is_met() {
        let gen = Generator::default();
        for _ in 0..1000 {
            let password = gen
                .generate_with_policy(20, 2, 2, true, false, Policy::all())
                .unwrap();
            assert!(Policy::all().is_satisfied_by(&password), "{password}");
        }
    }

    #[test]
    fn policy_does_not_retry_precondition_errors() {
        let gen = Generator::default();
        let err = gen
            .generate_with_policy(1, 1, 1, true, true, Policy::all())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExceedsTotalLength);
    }

    #[test]
    fn unsatisfiable_policy_gives_up_when_limited() {
        let gen = Generator::new(
            GeneratorInput::new().max_policy_attempts(NonZeroU32::new(5).unwrap()),
        )
        .unwrap();
        let err = gen
            .generate_with_policy(10, 0, 0, true, true, Policy::none().symbol(true))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyUnsatisfiable);
        assert_eq!(err.to_string(), "password policy was not satisfied after 5 attempts");
    }

    #[test]
    fn policy_checks() {
        let cases = [
            ("MARYHADALITTLELAMB", Policy::all(), false),
            ("MARYHADALITTLELAMB$", Policy::all(), false),
            ("M4RYHADALITTLELAMB$", Policy::all(), false),
            ("M4RYHADAlittleLAMB$", Policy::all(), true),
            ("maryhadalittlelamb", Policy::none().lower(true), true),
            ("MARYHADALITTLELAMB", Policy::none().lower(true), false),
            ("MARYHADALITTLELAMB", Policy::none().upper(true), true),
            ("maryhadalittlelamb", Policy::none().upper(true), false),
            ("M4RYHADALITTLELAMB", Policy::none().digit(true), true),
            ("maryhadalittlelamb", Policy::none().digit(true), false),
            ("", Policy::none(), true),
        ];
        for (password, policy, expected) in cases {
            assert_eq!(policy.is_satisfied_by(password), expected, "{password} {policy:?}");
        }
    }

    #[test]
    #[should_panic(expected = "number of digits exceeds available digits")]
    fn must_generate_panics() {
        Generator::default().must_generate(52, 11, 0, true, false);
    }
}
