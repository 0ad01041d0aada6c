//! Type-safe local key-value storage for the booking client.
//!
//! Plays the part browser local storage plays for a web client: a
//! non-authoritative place for the bearer token and for small display
//! fallbacks such as the dates chosen at booking time.
//!
//! # Example
//!
//! ```rust
//! use trip_cache::{Cache, CredentialStore};
//!
//! let cache = Cache::in_memory();
//!
//! // Store a value
//! cache.set("booking-date:A1", &("2025-05-10", "2025-05-11")).unwrap();
//!
//! // Retrieve a value
//! let dates: Option<(String, String)> = cache.get("booking-date:A1").unwrap();
//! assert!(dates.is_some());
//!
//! // Credentials share the same storage
//! let credentials = CredentialStore::new(cache.clone());
//! credentials.set_token("token").unwrap();
//! assert!(credentials.is_authenticated());
//! ```

mod credentials;
mod error;
mod kv;

pub use credentials::CredentialStore;
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, CredentialStore};
}
