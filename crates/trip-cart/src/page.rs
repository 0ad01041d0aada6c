//! Cart page controller: merged rows, selection and row-level actions.

use crate::batch::BatchReport;
use crate::dates::DateCache;
use crate::handle::CartHandle;
use crate::CartError;
use trip_commerce::cart::{merge_line_items, selected_total, CartSelection, MergedLineItem};
use trip_commerce::{ActivityId, LineItemId, Money};

/// State behind the cart page.
///
/// Rows are recomputed from the store on every call. Selection is by
/// activity, while quantity changes and removals act on the line items
/// that make up a row.
#[derive(Debug, Clone)]
pub struct CartPage {
    cart: CartHandle,
    dates: DateCache,
    selection: CartSelection,
}

impl CartPage {
    pub fn new(cart: CartHandle, dates: DateCache) -> Self {
        Self {
            cart,
            dates,
            selection: CartSelection::new(),
        }
    }

    /// Fetch the cart and return fresh rows.
    pub async fn load(&mut self) -> Result<Vec<MergedLineItem>, CartError> {
        let items = self.cart.fetch().await?;
        let rows = merge_line_items(&items);
        self.selection.retain_existing(&rows);
        Ok(rows)
    }

    pub fn rows(&self) -> Result<Vec<MergedLineItem>, CartError> {
        self.cart.rows()
    }

    pub fn row(&self, activity_id: &ActivityId) -> Result<MergedLineItem, CartError> {
        self.rows()?
            .into_iter()
            .find(|r| &r.activity_id == activity_id)
            .ok_or_else(|| CartError::NotFound(format!("Activity {activity_id} is not in the cart")))
    }

    pub fn selection(&self) -> &CartSelection {
        &self.selection
    }

    /// Flip one row's checkbox. Returns whether it is now selected.
    pub fn toggle(&mut self, activity_id: &ActivityId) -> bool {
        self.selection.toggle(activity_id)
    }

    /// Select every row, or clear the selection when all are already selected.
    pub fn toggle_all(&mut self) -> Result<(), CartError> {
        let rows = self.rows()?;
        self.selection.toggle_all(&rows);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Total of the selected rows.
    pub fn selected_total(&self) -> Result<Money, CartError> {
        let rows = self.rows()?;
        Ok(selected_total(&rows, &self.selection, self.cart.currency()?)?)
    }

    /// Add one unit to a row through its first line item.
    pub async fn increase_row(&self, activity_id: &ActivityId) -> Result<(), CartError> {
        let id = self.first_id(activity_id)?;
        self.cart.increase(&id).await
    }

    /// Take one unit off a row through its last line item.
    pub async fn decrease_row(&self, activity_id: &ActivityId) -> Result<(), CartError> {
        let id = self.last_id(activity_id)?;
        self.cart.decrease(&id).await
    }

    /// Remove every line item of a row.
    pub async fn remove_row(&mut self, activity_id: &ActivityId) -> Result<BatchReport, CartError> {
        let row = self.row(activity_id)?;
        let result = self.cart.remove_many(&row.line_item_ids).await;
        self.sync_selection();
        result
    }

    /// Remove every line item of every selected row.
    pub async fn remove_selected(&mut self) -> Result<BatchReport, CartError> {
        let ids: Vec<LineItemId> = self
            .rows()?
            .into_iter()
            .filter(|r| self.selection.is_selected(&r.activity_id))
            .flat_map(|r| r.line_item_ids)
            .collect();
        if ids.is_empty() {
            return Err(CartError::Validation("no items selected".into()));
        }

        let result = self.cart.remove_many(&ids).await;
        self.sync_selection();
        result
    }

    /// Dates for a row, falling back to the ones remembered at booking time.
    pub fn display_dates(&self, row: &MergedLineItem) -> Option<String> {
        self.dates.display(row)
    }

    fn sync_selection(&mut self) {
        match self.rows() {
            Ok(rows) => self.selection.retain_existing(&rows),
            Err(_) => self.selection.clear(),
        }
    }

    fn first_id(&self, activity_id: &ActivityId) -> Result<LineItemId, CartError> {
        self.row(activity_id)?
            .line_item_ids
            .first()
            .cloned()
            .ok_or_else(|| CartError::NotFound(format!("Activity {activity_id} has no line items")))
    }

    fn last_id(&self, activity_id: &ActivityId) -> Result<LineItemId, CartError> {
        self.row(activity_id)?
            .line_item_ids
            .last()
            .cloned()
            .ok_or_else(|| CartError::NotFound(format!("Activity {activity_id} has no line items")))
    }
}
