//! Secrets-directory file provider.
//!
//! # Responsibilities
//! - Resolve a key to the trimmed contents of `base_dir/key`
//! - Reject keys that would escape the secrets directory
//!
//! # Design Decisions
//! - Contents are trimmed: mounted secret files routinely carry a trailing
//!   newline that must not end up in connection strings

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{SecretError, SecretProvider};

/// Resolves keys as files inside a configured secrets directory
/// (e.g. a mounted `/run/secrets` volume).
#[derive(Debug, Clone)]
pub struct FileProvider {
    base_dir: PathBuf,
}

impl FileProvider {
    /// Create a provider rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl SecretProvider for FileProvider {
    fn resolve(&self, key: &str) -> Result<String, SecretError> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(SecretError::Backend(
                "no secrets directory configured".into(),
            ));
        }
        if key.is_empty() {
            return Err(SecretError::Backend("empty secret file name".into()));
        }

        let relative = Path::new(key);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(SecretError::Backend(
                format!("secret file name '{key}' escapes the secrets directory").into(),
            ));
        }

        let path = self.base_dir.join(relative);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(SecretError::NotFound(format!(
                "no secret file at '{}'",
                path.display()
            ))),
            Err(err) => Err(SecretError::Backend(Box::new(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_trimmed_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("db_password"), "s3cret\n").unwrap();

        let provider = FileProvider::new(dir.path());
        assert_eq!(provider.resolve("db_password").unwrap(), "s3cret");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path());

        let err = provider.resolve("absent").unwrap_err();
        assert!(matches!(err, SecretError::NotFound(_)));
    }

    #[test]
    fn test_unconfigured_directory_is_backend_error() {
        let provider = FileProvider::new("");
        let err = provider.resolve("anything").unwrap_err();

        assert!(matches!(err, SecretError::Backend(_)));
        assert!(err.to_string().contains("no secrets directory"));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path());
        assert!(matches!(
            provider.resolve(""),
            Err(SecretError::Backend(_))
        ));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(dir.path());

        for key in ["../etc/passwd", "/etc/passwd"] {
            let err = provider.resolve(key).unwrap_err();
            assert!(matches!(err, SecretError::Backend(_)), "key {key}");
        }
    }
}
