//! Environment-variable secret provider.

use std::env;

use super::{SecretError, SecretProvider};

/// Resolves keys as process environment variables.
///
/// A variable that is set to the empty string counts as **found**: the
/// empty string is a legal secret value, and only an absent variable is
/// reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProvider;

impl SecretProvider for EnvProvider {
    fn resolve(&self, key: &str) -> Result<String, SecretError> {
        match env::var(key) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(SecretError::NotFound(format!(
                "environment variable '{key}' is not set"
            ))),
            Err(err @ env::VarError::NotUnicode(_)) => Err(SecretError::Backend(Box::new(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_set_variable_resolves() {
        env::set_var("CONFIDANT_TEST_ENV_SET", "hunter2");
        let value = EnvProvider.resolve("CONFIDANT_TEST_ENV_SET").unwrap();
        assert_eq!(value, "hunter2");
        env::remove_var("CONFIDANT_TEST_ENV_SET");
    }

    #[test]
    #[serial]
    fn test_unset_variable_is_not_found() {
        env::remove_var("CONFIDANT_TEST_ENV_UNSET");
        let err = EnvProvider.resolve("CONFIDANT_TEST_ENV_UNSET").unwrap_err();
        assert!(matches!(err, SecretError::NotFound(_)));
    }

    #[test]
    #[serial]
    fn test_empty_variable_counts_as_found() {
        env::set_var("CONFIDANT_TEST_ENV_EMPTY", "");
        let value = EnvProvider.resolve("CONFIDANT_TEST_ENV_EMPTY").unwrap();
        assert_eq!(value, "");
        env::remove_var("CONFIDANT_TEST_ENV_EMPTY");
    }
}
