//! Booking submission: turn a filled-in form into cart entries.

use crate::batch::BatchReport;
use crate::dates::DateCache;
use crate::session::Route;
use crate::store::CartStore;
use crate::CartError;
use trip_commerce::booking::{BookingAction, BookingForm};

/// Where the user lands after a successful booking.
pub fn route_for(action: BookingAction) -> Route {
    match action {
        BookingAction::AddToCart => Route::Cart,
        BookingAction::BookNow => Route::Checkout,
    }
}

/// Submits booking forms through a [`CartStore`].
#[derive(Debug, Clone)]
pub struct BookingFlow {
    store: CartStore,
    dates: DateCache,
}

impl BookingFlow {
    pub fn new(store: CartStore, dates: DateCache) -> Self {
        Self { store, dates }
    }

    /// Add every unit of the form to the cart, then navigate.
    ///
    /// On success the chosen dates are remembered for display, the user is
    /// notified, and sent to the cart or to checkout depending on `action`.
    /// Failures are reported to the user and returned; nothing is navigated.
    #[tracing::instrument(skip_all, fields(activity_id = %form.activity_id(), action = action.as_str()))]
    pub async fn submit(
        &self,
        form: &BookingForm,
        action: BookingAction,
    ) -> Result<BatchReport, CartError> {
        let hooks = self.store.hooks();

        let requests = match form.requests() {
            Ok(requests) => requests,
            Err(e) => {
                let e = CartError::from(e);
                hooks.notify_error(e.to_string());
                return Err(e);
            }
        };
        tracing::debug!(requests = requests.len(), "submitting booking");

        let result = self
            .store
            .add(form.activity_id(), form.quantity(), Some(form.dates()))
            .await;

        match result {
            Ok(report) => {
                if let Err(e) = self.dates.remember(form.activity_id(), form.dates()) {
                    tracing::warn!(error = %e, "failed to remember booking dates");
                }
                hooks.notify_success(match action {
                    BookingAction::AddToCart => "Added to cart",
                    BookingAction::BookNow => "Added to cart, continuing to checkout",
                });
                hooks.navigate(route_for(action));
                Ok(report)
            }
            Err(CartError::PartialFailure(report)) => {
                tracing::error!(failed = report.failed(), total = report.total(), "booking partially failed");
                hooks.notify_error(format!(
                    "Failed to add {} of {} bookings",
                    report.failed(),
                    report.total()
                ));
                Err(CartError::PartialFailure(report))
            }
            // Already reported by the store.
            Err(CartError::SessionExpired) => Err(CartError::SessionExpired),
            Err(e) => {
                hooks.notify_error(e.to_string());
                Err(e)
            }
        }
    }
}
