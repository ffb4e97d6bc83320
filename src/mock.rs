use crate::{GenerateError, PasswordGenerator, Policy};

/// A [`PasswordGenerator`] that always answers the same way, whatever it's asked for.
///
/// For tests of code that takes a `PasswordGenerator`, where a real random password would get in
/// the way.
#[derive(Clone, Debug)]
pub struct MockPasswordGenerator {
    result: Result<String, GenerateError>,
}

impl MockPasswordGenerator {
    /// Always returns `password`.
    pub fn new(password: impl Into<String>) -> MockPasswordGenerator {
        MockPasswordGenerator {
            result: Ok(password.into()),
        }
    }

    /// Always fails with `err`; `must_generate` panics with it.
    pub fn failing(err: impl Into<GenerateError>) -> MockPasswordGenerator {
        MockPasswordGenerator {
            result: Err(err.into()),
        }
    }
}

impl PasswordGenerator for MockPasswordGenerator {
    fn generate(
        &self,
        _: usize,
        _: usize,
        _: usize,
        _: bool,
        _: bool,
    ) -> Result<String, GenerateError> {
        self.result.clone()
    }

    fn generate_with_policy(
        &self,
        _: usize,
        _: usize,
        _: usize,
        _: bool,
        _: bool,
        _: Policy,
    ) -> Result<String, GenerateError> {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn greeting(gen: &dyn PasswordGenerator) -> String {
        // The arguments don't matter to the mock.
        format!("your password is {}", gen.must_generate(1, 2, 3, false, false))
    }

    #[test]
    fn canned_password() {
        let gen = MockPasswordGenerator::new("canned-response");
        assert_eq!(greeting(&gen), "your password is canned-response");
        assert_eq!(
            gen.generate_with_policy(0, 0, 0, false, false, Policy::all()).unwrap(),
            "canned-response"
        );
    }

    #[test]
    fn canned_error() {
        let gen = MockPasswordGenerator::failing(ErrorKind::RandomSource);
        assert_eq!(
            gen.generate(64, 10, 10, true, true).unwrap_err().kind(),
            ErrorKind::RandomSource
        );
        assert_eq!(
            gen.generate_with_policy(64, 10, 10, true, true, Policy::none())
                .unwrap_err()
                .kind(),
            ErrorKind::RandomSource
        );
    }

    #[test]
    #[should_panic(expected = "number of symbols exceeds available symbols")]
    fn must_generate_panics_with_the_error() {
        let gen = MockPasswordGenerator::failing(ErrorKind::SymbolsExceedsAvailable);
        greeting(&gen);
    }
}
