//! Cart synchronization for the activity booking client.
//!
//! The [`CartStore`] keeps the signed-in user's cart in step with the
//! remote API. It never patches local state optimistically: every mutation
//! is followed by a full re-fetch, and the last server read wins.
//!
//! - **Store**: fetch (with request coalescing), add, remove, update,
//!   increase, decrease, batch removal and totals
//! - **Handle**: a weak, restricted view for consumers that only adjust quantities
//! - **Session**: notifications, navigation and session-expiry handling
//! - **Booking**: the booking-form submission flow
//! - **Page**: merged rows, selection and row actions for the cart page
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trip_cart::prelude::*;
//!
//! let credentials = CredentialStore::in_memory();
//! let api = HttpCartApi::from_config(&ClientConfig::default().with_api_key(key), credentials.clone())?;
//! let hooks = SessionHooks::new(credentials, notifier, navigator);
//! let store = CartStore::new(Arc::new(api), hooks);
//!
//! store.fetch().await?;
//! println!("{} items, {}", store.item_count(), store.total()?);
//! ```

mod api;
mod batch;
mod booking;
mod dates;
mod error;
mod handle;
mod http;
mod page;
mod session;
mod store;

pub use api::CartApi;
pub use batch::{BatchEntry, BatchOutcome, BatchReport};
pub use booking::{route_for, BookingFlow};
pub use dates::DateCache;
pub use error::CartError;
pub use handle::CartHandle;
pub use http::HttpCartApi;
pub use page::CartPage;
pub use session::{
    Navigator, Notification, NotificationLevel, Notifier, Route, SessionConfig, SessionHooks,
};
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BatchReport, BookingFlow, CartApi, CartError, CartHandle, CartPage, CartStore, DateCache,
        HttpCartApi, Navigator, Notification, Notifier, Route, SessionConfig, SessionHooks,
    };
    pub use trip_cache::CredentialStore;
    pub use trip_commerce::prelude::*;
    pub use trip_data::ClientConfig;
}
