//! Merged display rows and checkout selection.
//!
//! The remote API stores one line item per booked unit, so the same
//! activity usually shows up several times. The cart page groups them by
//! activity for display and selection, while mutations keep acting on the
//! underlying line item ids.

use crate::cart::line_item::mismatch_or_overflow;
use crate::cart::{BookingDate, LineItem};
use crate::error::CommerceError;
use crate::ids::{ActivityId, LineItemId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Line items sharing one activity id, aggregated for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergedLineItem {
    pub activity_id: ActivityId,
    pub title: Option<String>,
    /// Sum of constituent quantities.
    pub quantity: u32,
    /// Constituent line item ids in cart order.
    pub line_item_ids: Vec<LineItemId>,
    /// Unit price of the first constituent.
    pub unit_price: Money,
    /// Full price of the first constituent, for strike-through display.
    pub price: Money,
    /// First booking date found among the constituents.
    pub booking_date: Option<BookingDate>,
    /// Sum of constituent subtotals.
    pub subtotal: Money,
}

impl MergedLineItem {
    fn from_item(item: &LineItem) -> Result<Self, CommerceError> {
        Ok(Self {
            activity_id: item.activity_id.clone(),
            title: item.title.clone(),
            quantity: item.quantity,
            line_item_ids: vec![item.id.clone()],
            unit_price: item.unit_price(),
            price: item.price,
            booking_date: item.booking_date,
            subtotal: item.subtotal()?,
        })
    }

    fn absorb(&mut self, item: &LineItem) -> Result<(), CommerceError> {
        let subtotal = item.subtotal()?;
        self.subtotal = self
            .subtotal
            .try_add(&subtotal)
            .ok_or_else(|| mismatch_or_overflow(&self.subtotal, &subtotal))?;
        self.quantity = self.quantity.saturating_add(item.quantity);
        self.line_item_ids.push(item.id.clone());
        if self.title.is_none() {
            self.title = item.title.clone();
        }
        if self.booking_date.is_none() {
            self.booking_date = item.booking_date;
        }
        Ok(())
    }

    /// Whether this row contains the given line item.
    pub fn contains(&self, id: &LineItemId) -> bool {
        self.line_item_ids.contains(id)
    }
}

/// Group line items by activity id, preserving first-appearance order.
///
/// Items whose subtotal cannot be computed are left out. Use
/// [`try_merge_line_items`] to surface that case instead.
pub fn merge_line_items(items: &[LineItem]) -> Vec<MergedLineItem> {
    try_merge_line_items(items).unwrap_or_else(|_| {
        let priceable: Vec<LineItem> = items
            .iter()
            .filter(|item| item.subtotal().is_ok())
            .cloned()
            .collect();
        try_merge_line_items(&priceable).unwrap_or_default()
    })
}

/// Like [`merge_line_items`], but surfaces pricing errors.
pub fn try_merge_line_items(items: &[LineItem]) -> Result<Vec<MergedLineItem>, CommerceError> {
    let mut rows: Vec<MergedLineItem> = Vec::new();
    let mut index: HashMap<&ActivityId, usize> = HashMap::new();

    for item in items {
        match index.get(&item.activity_id) {
            Some(&pos) => rows[pos].absorb(item)?,
            None => {
                index.insert(&item.activity_id, rows.len());
                rows.push(MergedLineItem::from_item(item)?);
            }
        }
    }

    Ok(rows)
}

/// Set of merged rows ticked for checkout, keyed by activity id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSelection {
    selected: BTreeSet<ActivityId>,
}

impl CartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, activity_id: &ActivityId) -> bool {
        if self.is_selected(activity_id) {
            self.deselect(activity_id);
            false
        } else {
            self.select(activity_id.clone());
            true
        }
    }

    pub fn select(&mut self, activity_id: ActivityId) {
        self.selected.insert(activity_id);
    }

    pub fn deselect(&mut self, activity_id: &ActivityId) {
        self.selected.remove(activity_id);
    }

    /// Select every row, or clear the selection if every row is already selected.
    pub fn toggle_all(&mut self, rows: &[MergedLineItem]) {
        if !rows.is_empty() && rows.iter().all(|r| self.selected.contains(&r.activity_id)) {
            self.selected.clear();
        } else {
            self.selected = rows.iter().map(|r| r.activity_id.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop selections whose row no longer exists.
    pub fn retain_existing(&mut self, rows: &[MergedLineItem]) {
        self.selected
            .retain(|id| rows.iter().any(|r| &r.activity_id == id));
    }

    pub fn is_selected(&self, activity_id: &ActivityId) -> bool {
        self.selected.contains(activity_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityId> + Clone {
        self.selected.iter()
    }
}

/// Total of the selected rows.
///
/// Each selected id is looked up by scanning `rows`; ids with no matching
/// row contribute nothing.
pub fn selected_total(
    rows: &[MergedLineItem],
    selection: &CartSelection,
    currency: Currency,
) -> Result<Money, CommerceError> {
    let subtotals = selection
        .iter()
        .filter_map(|id| rows.iter().find(|r| &r.activity_id == id))
        .map(|row| &row.subtotal);

    Money::try_sum(subtotals.clone(), currency).ok_or_else(|| {
        match subtotals.clone().find(|m| m.currency != currency) {
            Some(other) => mismatch_or_overflow(&Money::zero(currency), other),
            None => CommerceError::Overflow,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idr(amount: i64) -> Money {
        Money::new(amount, Currency::IDR)
    }

    fn item(id: &str, activity: &str, quantity: u32, price: i64) -> LineItem {
        LineItem::new(LineItemId::new(id), ActivityId::new(activity), quantity, idr(price))
    }

    #[test]
    fn test_merge_same_activity() {
        let items = vec![
            item("li-1", "A1", 1, 100_000),
            item("li-2", "B2", 2, 50_000),
            item("li-3", "A1", 2, 100_000),
        ];

        let rows = merge_line_items(&items);
        assert_eq!(rows.len(), 2);

        let a1 = &rows[0];
        assert_eq!(a1.activity_id, ActivityId::new("A1"));
        assert_eq!(a1.quantity, 3);
        assert_eq!(
            a1.line_item_ids,
            vec![LineItemId::new("li-1"), LineItemId::new("li-3")]
        );
        assert_eq!(a1.subtotal, idr(300_000));

        assert_eq!(rows[1].activity_id, ActivityId::new("B2"));
        assert_eq!(rows[1].quantity, 2);
    }

    #[test]
    fn test_merge_keeps_first_booking_date() {
        let dates = BookingDate::parse("2025-05-10", "2025-05-11").unwrap();
        let items = vec![
            item("li-1", "A1", 1, 100),
            item("li-2", "A1", 1, 100).with_booking_date(dates),
        ];
        let rows = merge_line_items(&items);
        assert_eq!(rows[0].booking_date, Some(dates));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_line_items(&[]).is_empty());
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = CartSelection::new();
        let a1 = ActivityId::new("A1");
        assert!(selection.toggle(&a1));
        assert!(selection.is_selected(&a1));
        assert!(!selection.toggle(&a1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_toggle_all() {
        let rows = merge_line_items(&[item("li-1", "A1", 1, 100), item("li-2", "B2", 1, 100)]);
        let mut selection = CartSelection::new();
        selection.select(ActivityId::new("A1"));

        selection.toggle_all(&rows);
        assert_eq!(selection.len(), 2);

        selection.toggle_all(&rows);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_retain_existing() {
        let rows = merge_line_items(&[item("li-1", "A1", 1, 100)]);
        let mut selection = CartSelection::new();
        selection.select(ActivityId::new("A1"));
        selection.select(ActivityId::new("gone"));
        selection.retain_existing(&rows);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_selected_total() {
        let rows = merge_line_items(&[
            item("li-1", "A1", 1, 100_000),
            item("li-2", "A1", 1, 100_000),
            item("li-3", "B2", 1, 40_000),
            item("li-4", "C3", 1, 10_000),
        ]);
        let mut selection = CartSelection::new();
        selection.select(ActivityId::new("A1"));
        selection.select(ActivityId::new("C3"));
        selection.select(ActivityId::new("missing"));

        let total = selected_total(&rows, &selection, Currency::IDR).unwrap();
        assert_eq!(total, idr(210_000));
    }
}
