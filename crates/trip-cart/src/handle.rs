//! A capability-restricted view over a [`CartStore`].

use crate::batch::BatchReport;
use crate::store::{CartStore, StoreInner};
use crate::CartError;
use std::sync::Weak;
use trip_commerce::cart::{merge_line_items, LineItem, MergedLineItem};
use trip_commerce::{Currency, LineItemId, Money};

/// Read access plus quantity changes, for consumers that should not add items.
///
/// Holds the store weakly. Once the store is disposed or every owning
/// [`CartStore`] is dropped, every call fails with [`CartError::Inactive`].
/// All operations delegate to the store.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Weak<StoreInner>,
}

impl CartHandle {
    pub(crate) fn new(store: &CartStore) -> Self {
        Self {
            store: store.downgrade(),
        }
    }

    fn store(&self) -> Result<CartStore, CartError> {
        let store = self
            .store
            .upgrade()
            .map(CartStore::from_inner)
            .ok_or(CartError::Inactive)?;
        store.ensure_active()?;
        Ok(store)
    }

    pub fn is_active(&self) -> bool {
        self.store().is_ok()
    }

    pub fn items(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self.store()?.items())
    }

    /// Cached items grouped by activity.
    pub fn rows(&self) -> Result<Vec<MergedLineItem>, CartError> {
        Ok(merge_line_items(&self.store()?.items()))
    }

    pub fn item_count(&self) -> Result<u32, CartError> {
        Ok(self.store()?.item_count())
    }

    pub fn total(&self) -> Result<Money, CartError> {
        self.store()?.total()
    }

    pub fn currency(&self) -> Result<Currency, CartError> {
        Ok(self.store()?.currency())
    }

    pub async fn fetch(&self) -> Result<Vec<LineItem>, CartError> {
        self.store()?.fetch().await
    }

    pub async fn increase(&self, id: &LineItemId) -> Result<(), CartError> {
        self.store()?.increase(id).await
    }

    pub async fn decrease(&self, id: &LineItemId) -> Result<(), CartError> {
        self.store()?.decrease(id).await
    }

    pub async fn remove(&self, id: &LineItemId) -> Result<(), CartError> {
        self.store()?.remove(id).await
    }

    pub async fn remove_many(&self, ids: &[LineItemId]) -> Result<BatchReport, CartError> {
        self.store()?.remove_many(ids).await
    }
}
