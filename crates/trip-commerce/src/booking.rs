//! Booking forms and the single-unit requests they expand into.

use crate::cart::{BookingDate, LineItem};
use crate::error::CommerceError;
use crate::ids::ActivityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payload of one add-to-cart request.
///
/// The remote API books one unit per request, so `quantity` is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub activity_id: ActivityId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<BookingDate>,
}

impl BookingRequest {
    /// A single-unit request.
    pub fn single(activity_id: ActivityId, booking_date: Option<BookingDate>) -> Self {
        Self {
            activity_id,
            quantity: 1,
            booking_date,
        }
    }

    /// Expand a quantity into that many single-unit requests.
    pub fn expand(
        activity_id: &ActivityId,
        quantity: u32,
        booking_date: Option<BookingDate>,
    ) -> Vec<BookingRequest> {
        (0..quantity)
            .map(|_| BookingRequest::single(activity_id.clone(), booking_date))
            .collect()
    }
}

/// What the user clicked on the booking modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingAction {
    /// Add to cart and go to the cart page.
    AddToCart,
    /// Add to cart and go straight to checkout.
    BookNow,
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::AddToCart => "add_to_cart",
            BookingAction::BookNow => "book_now",
        }
    }
}

/// State of the booking modal for one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    activity_id: ActivityId,
    quantity: u32,
    dates: BookingDate,
}

impl BookingForm {
    /// A form for one unit, one night from `check_in`.
    pub fn new(activity_id: ActivityId, check_in: NaiveDate) -> Result<Self, CommerceError> {
        Ok(Self {
            activity_id,
            quantity: 1,
            dates: BookingDate::starting(check_in)?,
        })
    }

    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, CommerceError> {
        self.set_quantity(quantity)?;
        Ok(self)
    }

    pub fn with_dates(mut self, dates: BookingDate) -> Self {
        self.dates = dates;
        self
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn dates(&self) -> BookingDate {
        self.dates
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), CommerceError> {
        self.quantity = LineItem::validate_quantity(i64::from(quantity))?;
        Ok(())
    }

    pub fn increment(&mut self) -> Result<(), CommerceError> {
        self.set_quantity(self.quantity.saturating_add(1))
    }

    /// Decrement, stopping at 1.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// See [`BookingDate::set_check_in`].
    pub fn set_check_in(&mut self, check_in: NaiveDate) -> Result<(), CommerceError> {
        self.dates.set_check_in(check_in)
    }

    pub fn set_check_out(&mut self, check_out: NaiveDate) -> Result<(), CommerceError> {
        self.dates.set_check_out(check_out)
    }

    /// Validate and expand into single-unit requests.
    pub fn requests(&self) -> Result<Vec<BookingRequest>, CommerceError> {
        if self.activity_id.is_blank() {
            return Err(CommerceError::MissingField("activityId"));
        }
        LineItem::validate_quantity(i64::from(self.quantity))?;
        Ok(BookingRequest::expand(
            &self.activity_id,
            self.quantity,
            Some(self.dates),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_expand_issues_one_request_per_unit() {
        for quantity in 1..=5 {
            let requests = BookingRequest::expand(&ActivityId::new("A1"), quantity, None);
            assert_eq!(requests.len(), quantity as usize);
            assert!(requests.iter().all(|r| r.quantity == 1));
        }
    }

    #[test]
    fn test_request_payload() {
        let request = BookingRequest::single(ActivityId::new("A1"), None);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"activityId": "A1", "quantity": 1}));
    }

    #[test]
    fn test_request_payload_with_dates() {
        let dates = BookingDate::parse("2025-05-10", "2025-05-11").unwrap();
        let request = BookingRequest::single(ActivityId::new("A1"), Some(dates));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["bookingDate"]["checkIn"], "2025-05-10");
    }

    #[test]
    fn test_form_moves_check_out_with_check_in() {
        let mut form = BookingForm::new(ActivityId::new("A1"), date("2025-05-01")).unwrap();
        form.set_check_out(date("2025-05-05")).unwrap();
        form.set_check_in(date("2025-05-10")).unwrap();
        assert_eq!(form.dates().check_out(), date("2025-05-11"));
    }

    #[test]
    fn test_form_quantity_bounds() {
        let mut form = BookingForm::new(ActivityId::new("A1"), date("2025-05-01")).unwrap();
        form.decrement();
        assert_eq!(form.quantity(), 1);
        form.increment().unwrap();
        assert_eq!(form.quantity(), 2);
        assert!(form.set_quantity(0).is_err());
    }

    #[test]
    fn test_form_requests() {
        let form = BookingForm::new(ActivityId::new("A1"), date("2025-05-01"))
            .unwrap()
            .with_quantity(3)
            .unwrap();
        let requests = form.requests().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.booking_date == Some(form.dates())));
    }

    #[test]
    fn test_form_requires_activity() {
        let form = BookingForm::new(ActivityId::new(""), date("2025-05-01")).unwrap();
        assert_eq!(
            form.requests(),
            Err(CommerceError::MissingField("activityId"))
        );
    }
}
