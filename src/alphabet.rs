use std::collections::HashSet;
use std::fmt;

/// The default lowercase letters.
pub const LOWER_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// The default uppercase letters.
pub const UPPER_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The default digits.
pub const DIGITS: &str = "0123456789";

/// The default symbols.
pub const SYMBOLS: &str = "~!@#$%^&*()_+`-={}|[]\\:\"<>?,./";

/// An ordered set of distinct characters to draw from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Build an alphabet from the characters of `chars`, in order. A repeated character is only
    /// kept the first time it appears. Callers must not pass an empty string.
    pub(crate) fn new(chars: &str) -> Alphabet {
        let mut seen = HashSet::new();
        Alphabet(chars.chars().filter(|ch| seen.insert(*ch)).collect())
    }

    /// `chars`, unless it is absent or empty, in which case `default`.
    pub(crate) fn or_default(chars: Option<&str>, default: &str) -> Alphabet {
        match chars {
            Some(chars) if !chars.is_empty() => Alphabet::new(chars),
            _ => Alphabet::new(default),
        }
    }

    /// This alphabet followed by whatever of `other` it doesn't already contain.
    pub(crate) fn extended_with(&self, other: &Alphabet) -> Alphabet {
        let mut chars = self.0.clone();
        chars.extend(other.0.iter().filter(|ch| !self.0.contains(ch)));
        Alphabet(chars)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.0.contains(&ch)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|ch| fmt::Write::write_char(f, *ch))
    }
}

/// Whether `s` has a lowercase letter.
pub fn contains_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase)
}

/// Whether `s` has an uppercase letter.
pub fn contains_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}

/// Whether `s` has an ASCII digit.
pub fn contains_digit(s: &str) -> bool {
    s.chars().any(|ch| ch.is_ascii_digit())
}

/// Whether `s` has a symbol, which is anything that isn't an ASCII letter or digit. This does not
/// consult any symbol alphabet: a non-ASCII letter from a custom letter alphabet counts, too.
pub fn contains_symbol(s: &str) -> bool {
    s.chars().any(|ch| !ch.is_ascii_alphanumeric())
}
