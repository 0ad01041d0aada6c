//! Activity booking and cart domain types.
//!
//! This crate holds the plain data side of the booking client:
//!
//! - **Ids**: newtype identifiers for activities, line items and users
//! - **Money**: integer amounts in the currency's smallest unit
//! - **Cart**: line items, booking date ranges, merged display rows, selection
//! - **Booking**: booking forms and their expansion into single-unit requests
//!
//! Nothing here performs I/O. The synchronization logic that talks to the
//! remote API lives in `trip-cart`.
//!
//! # Example
//!
//! ```rust
//! use trip_commerce::prelude::*;
//!
//! let items = vec![
//!     LineItem::new(LineItemId::new("li-1"), ActivityId::new("A1"), 1, Money::new(100_000, Currency::IDR))
//!         .with_discounted_price(Money::new(90_000, Currency::IDR)),
//!     LineItem::new(LineItemId::new("li-2"), ActivityId::new("A1"), 2, Money::new(100_000, Currency::IDR))
//!         .with_discounted_price(Money::new(90_000, Currency::IDR)),
//! ];
//!
//! let rows = merge_line_items(&items);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].quantity, 3);
//! assert_eq!(cart_total(&items, Currency::IDR).unwrap().amount, 270_000);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod booking;
pub mod cart;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        cart_total, merge_line_items, selected_total, Activity, BookingDate, CartSelection,
        LineItem, MergedLineItem,
    };

    // Booking
    pub use crate::booking::{BookingAction, BookingForm, BookingRequest};
}
