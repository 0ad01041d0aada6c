//! The remote cart API as seen by the store.

use async_trait::async_trait;
use trip_commerce::booking::BookingRequest;
use trip_commerce::cart::{Activity, LineItem};
use trip_commerce::{ActivityId, LineItemId};
use trip_data::FetchError;

/// Cart endpoints of the booking backend.
///
/// Every method maps to exactly one request. Implementations report the
/// server's status through [`FetchError`] untouched; the store decides what
/// a 401 or 404 means.
#[async_trait]
pub trait CartApi: Send + Sync + 'static {
    /// All line items of the authenticated user's cart.
    async fn list_cart(&self) -> Result<Vec<LineItem>, FetchError>;

    /// Detail of one activity.
    async fn get_activity(&self, id: &ActivityId) -> Result<Activity, FetchError>;

    /// Add one booking request to the cart.
    async fn add_to_cart(&self, request: &BookingRequest) -> Result<(), FetchError>;

    /// Overwrite a line item's quantity.
    async fn update_cart(&self, id: &LineItemId, quantity: u32) -> Result<(), FetchError>;

    /// Delete a line item.
    async fn delete_cart(&self, id: &LineItemId) -> Result<(), FetchError>;
}
