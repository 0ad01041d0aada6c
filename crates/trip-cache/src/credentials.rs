//! Bearer credential persistence.

use crate::{cache_key, Cache, CacheError};

/// Stores the bearer token sent with every API request.
///
/// Cheap to clone; clones see the same token.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    cache: Cache,
}

impl CredentialStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// A store that forgets the token when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Cache::in_memory())
    }

    /// The stored token, if any.
    ///
    /// An unreadable entry is treated as absent.
    pub fn token(&self) -> Option<String> {
        match self.cache.get::<String>(&Self::token_key()) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "stored token is unreadable");
                None
            }
        }
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<(), CacheError> {
        self.cache.set(&Self::token_key(), &token.into())
    }

    /// Forget the token.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(&Self::token_key())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn token_key() -> String {
        cache_key!("auth", "token")
    }
}
