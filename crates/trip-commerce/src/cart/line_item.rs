//! Cart line items and activity summaries.

use crate::cart::BookingDate;
use crate::error::CommerceError;
use crate::ids::{ActivityId, LineItemId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 99;

/// One server-tracked cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Server-assigned identifier.
    pub id: LineItemId,
    /// Activity being booked.
    pub activity_id: ActivityId,
    /// Activity title (denormalized for display).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Full unit price.
    pub price: Money,
    /// Discounted unit price, when the activity is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Money>,
    /// Dates chosen at booking time, when the server returns them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<BookingDate>,
}

impl LineItem {
    /// Create a line item with no discount and no dates.
    pub fn new(id: LineItemId, activity_id: ActivityId, quantity: u32, price: Money) -> Self {
        Self {
            id,
            activity_id,
            title: None,
            quantity,
            price,
            discounted_price: None,
            booking_date: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_discounted_price(mut self, price: Money) -> Self {
        self.discounted_price = Some(price);
        self
    }

    pub fn with_booking_date(mut self, dates: BookingDate) -> Self {
        self.booking_date = Some(dates);
        self
    }

    /// The price actually charged per unit.
    ///
    /// A missing or zero discounted price falls back to the full price.
    pub fn unit_price(&self) -> Money {
        match self.discounted_price {
            Some(discounted) if discounted.is_positive() => discounted,
            _ => self.price,
        }
    }

    /// `unit_price * quantity`.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.unit_price()
            .try_multiply(i64::from(self.quantity))
            .ok_or(CommerceError::Overflow)
    }

    /// Check a quantity against the per-item bounds.
    pub fn validate_quantity(quantity: i64) -> Result<u32, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > i64::from(MAX_QUANTITY_PER_ITEM) {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                i64::from(MAX_QUANTITY_PER_ITEM),
            ));
        }
        Ok(quantity as u32)
    }
}

/// Sum of every line item's subtotal.
pub fn cart_total(items: &[LineItem], currency: Currency) -> Result<Money, CommerceError> {
    items.iter().try_fold(Money::zero(currency), |acc, item| {
        let subtotal = item.subtotal()?;
        acc.try_add(&subtotal).ok_or_else(|| mismatch_or_overflow(&acc, &subtotal))
    })
}

pub(crate) fn mismatch_or_overflow(expected: &Money, got: &Money) -> CommerceError {
    if expected.currency != got.currency {
        CommerceError::CurrencyMismatch {
            expected: expected.currency.code().to_string(),
            got: got.currency.code().to_string(),
        }
    } else {
        CommerceError::Overflow
    }
}

/// Activity detail as returned by the catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Money>,
}
