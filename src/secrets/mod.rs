//! Secret providers and the scheme registry.
//!
//! # Data Flow
//! ```text
//! ${scheme:key} placeholder
//!     → SecretRegistry::resolve(scheme, key)
//!     → provider looked up by scheme (concurrent map)
//!     → SecretProvider::resolve(key)   [may block on I/O]
//!     → value substituted by the interpolation engine
//! ```
//!
//! # Design Decisions
//! - The registry is an explicitly constructed object, not process-global
//!   state; each test builds its own
//! - The provider handle is cloned out of the map before resolution, so a
//!   slow backend never holds a shard lock across network I/O
//! - Last registration for a scheme wins; replacement is effective for
//!   subsequent resolutions, never retroactively

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::error::BoxError;

pub mod env;
pub mod file;
pub mod vault;

#[cfg(feature = "aws")]
pub mod aws;

pub use env::EnvProvider;
pub use file::FileProvider;
pub use vault::{KvVersion, VaultProvider};

#[cfg(feature = "aws")]
pub use aws::AwsSecretsProvider;

/// Scheme used when a placeholder has no `scheme:` prefix.
pub const DEFAULT_SCHEME: &str = "env";

/// A failure reported by an individual provider.
///
/// Providers know nothing about schemes or placeholders; the registry lifts
/// these into [`ResolveError`] with that context attached.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The provider recognizes the request but the key has no value.
    #[error("{0}")]
    NotFound(String),

    /// The backend call itself failed (I/O, authentication, malformed
    /// response). Distinct from [`SecretError::NotFound`] so operators can
    /// tell misconfiguration from backend outage.
    #[error("{0}")]
    Backend(#[source] BoxError),
}

/// A pluggable backend resolving `key → value` for one scheme.
pub trait SecretProvider: Send + Sync {
    /// Resolve a key to its secret value.
    ///
    /// May block on I/O; callers needing bounds wrap the call with their own
    /// timeout or rely on the provider's construction-time timeout.
    fn resolve(&self, key: &str) -> Result<String, SecretError>;
}

/// A resolution failure with full placeholder context.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No provider is registered for the scheme.
    #[error("no secret provider registered for scheme '{scheme}' (key '{key}')")]
    UnknownScheme {
        /// Scheme named by the placeholder.
        scheme: String,
        /// Key the placeholder asked for.
        key: String,
    },

    /// The provider could not locate the key.
    #[error("secret '{scheme}:{key}' not found: {reason}")]
    NotFound {
        /// Scheme that handled the lookup.
        scheme: String,
        /// Key that has no value.
        key: String,
        /// Provider-supplied detail.
        reason: String,
    },

    /// The provider's backend call failed.
    #[error("secret provider '{scheme}' failed for key '{key}': {source}")]
    Provider {
        /// Scheme that handled the lookup.
        scheme: String,
        /// Key being resolved when the backend failed.
        key: String,
        #[source]
        source: BoxError,
    },
}

/// Concurrency-safe mapping from scheme name to secret provider.
///
/// Owned by service bootstrap and shared via `Arc`; controllers may register
/// and resolve concurrently during startup.
pub struct SecretRegistry {
    providers: DashMap<String, Arc<dyn SecretProvider>>,
    default_scheme: String,
}

impl SecretRegistry {
    /// Create an empty registry with `env` as the default scheme.
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    /// Create a registry with the environment provider pre-registered under
    /// the `env` scheme.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(DEFAULT_SCHEME, Arc::new(EnvProvider));
        registry
    }

    /// Override the scheme used for prefix-free placeholders.
    pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.default_scheme = scheme.into();
        self
    }

    /// Scheme used for prefix-free placeholders.
    pub fn default_scheme(&self) -> &str {
        &self.default_scheme
    }

    /// Register a provider for a scheme, replacing any existing one.
    pub fn register(&self, scheme: impl Into<String>, provider: Arc<dyn SecretProvider>) {
        let scheme = scheme.into();
        tracing::debug!(scheme = %scheme, "registered secret provider");
        self.providers.insert(scheme, provider);
    }

    /// Remove the provider for a scheme. Returns true if one was registered.
    pub fn unregister(&self, scheme: &str) -> bool {
        let removed = self.providers.remove(scheme).is_some();
        if removed {
            tracing::debug!(scheme = %scheme, "unregistered secret provider");
        }
        removed
    }

    /// Resolve a key through the provider registered for `scheme`.
    pub fn resolve(&self, scheme: &str, key: &str) -> Result<String, ResolveError> {
        // Clone the handle out so the map guard is dropped before the
        // provider call; resolution can block on network I/O.
        let provider = match self.providers.get(scheme) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                return Err(ResolveError::UnknownScheme {
                    scheme: scheme.to_string(),
                    key: key.to_string(),
                })
            }
        };

        provider.resolve(key).map_err(|err| match err {
            SecretError::NotFound(reason) => ResolveError::NotFound {
                scheme: scheme.to_string(),
                key: key.to_string(),
                reason,
            },
            SecretError::Backend(source) => ResolveError::Provider {
                scheme: scheme.to_string(),
                key: key.to_string(),
                source,
            },
        })
    }

    /// Resolve a key under the default scheme.
    pub fn resolve_default(&self, key: &str) -> Result<String, ResolveError> {
        self.resolve(&self.default_scheme, key)
    }
}

impl Default for SecretRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schemes: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("SecretRegistry")
            .field("schemes", &schemes)
            .field("default_scheme", &self.default_scheme)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(&'static str);

    impl SecretProvider for FixedProvider {
        fn resolve(&self, _key: &str) -> Result<String, SecretError> {
            Ok(self.0.to_string())
        }
    }

    struct MissingProvider;

    impl SecretProvider for MissingProvider {
        fn resolve(&self, key: &str) -> Result<String, SecretError> {
            Err(SecretError::NotFound(format!("no entry for '{key}'")))
        }
    }

    #[test]
    fn test_unknown_scheme_names_scheme() {
        let registry = SecretRegistry::new();
        let err = registry.resolve("vault", "DB_PASSWORD").unwrap_err();

        match err {
            ResolveError::UnknownScheme { scheme, key } => {
                assert_eq!(scheme, "vault");
                assert_eq!(key, "DB_PASSWORD");
            }
            other => panic!("expected UnknownScheme, got {other:?}"),
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = SecretRegistry::new();
        registry.register("fixed", Arc::new(FixedProvider("first")));
        registry.register("fixed", Arc::new(FixedProvider("second")));

        assert_eq!(registry.resolve("fixed", "any").unwrap(), "second");
    }

    #[test]
    fn test_unregister() {
        let registry = SecretRegistry::new();
        registry.register("fixed", Arc::new(FixedProvider("v")));

        assert!(registry.unregister("fixed"));
        assert!(!registry.unregister("fixed"));
        assert!(matches!(
            registry.resolve("fixed", "any"),
            Err(ResolveError::UnknownScheme { .. })
        ));
    }

    #[test]
    fn test_not_found_carries_context() {
        let registry = SecretRegistry::new();
        registry.register("store", Arc::new(MissingProvider));

        let err = registry.resolve("store", "API_KEY").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("store:API_KEY"), "{msg}");
    }

    #[test]
    fn test_default_scheme_override() {
        let registry = SecretRegistry::new().with_default_scheme("store");
        registry.register("store", Arc::new(FixedProvider("from-store")));

        assert_eq!(registry.resolve_default("any").unwrap(), "from-store");
    }

    #[test]
    fn test_concurrent_register_and_resolve() {
        let registry = Arc::new(SecretRegistry::new());
        registry.register("fixed", Arc::new(FixedProvider("stable")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    if i % 2 == 0 {
                        registry.register("churn", Arc::new(FixedProvider("value")));
                        registry.unregister("churn");
                    } else {
                        assert_eq!(registry.resolve("fixed", "k").unwrap(), "stable");
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
