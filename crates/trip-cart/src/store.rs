//! The cart store: local line items kept in step with the server.

use crate::api::CartApi;
use crate::batch::{BatchOutcome, BatchReport};
use crate::handle::CartHandle;
use crate::session::SessionHooks;
use crate::CartError;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use trip_commerce::booking::BookingRequest;
use trip_commerce::cart::{cart_total, BookingDate, LineItem};
use trip_commerce::{ActivityId, Currency, LineItemId, Money};

type FetchResult = Result<Vec<LineItem>, CartError>;
type FetchFuture = Shared<BoxFuture<'static, FetchResult>>;

pub(crate) struct StoreInner {
    api: Arc<dyn CartApi>,
    hooks: SessionHooks,
    currency: Currency,
    items: RwLock<Vec<LineItem>>,
    inflight: Mutex<Option<FetchFuture>>,
    /// Sequence number of the last fetch started.
    started: AtomicU64,
    /// Sequence number of the newest fetch whose result reached `items`.
    applied: AtomicU64,
    active: AtomicBool,
}

/// Single source of truth for the signed-in user's cart.
///
/// Every mutation is followed by a full re-fetch; local state is never
/// patched optimistically. Clones share state. Create one per session and
/// call [`dispose`](Self::dispose) on logout.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::new(Arc::new(api), hooks);
/// store.add(&ActivityId::new("A1"), 3, None).await?;
/// println!("{}", store.total()?);
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

impl CartStore {
    pub fn new(api: Arc<dyn CartApi>, hooks: SessionHooks) -> Self {
        Self::with_currency(api, hooks, Currency::default())
    }

    pub fn with_currency(api: Arc<dyn CartApi>, hooks: SessionHooks, currency: Currency) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                hooks,
                currency,
                items: RwLock::new(Vec::new()),
                inflight: Mutex::new(None),
                started: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                active: AtomicBool::new(true),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<StoreInner> {
        Arc::downgrade(&self.inner)
    }

    /// A restricted view that stops working once this store is disposed or dropped.
    pub fn handle(&self) -> CartHandle {
        CartHandle::new(self)
    }

    pub fn hooks(&self) -> &SessionHooks {
        &self.inner.hooks
    }

    pub fn currency(&self) -> Currency {
        self.inner.currency
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Drop all local state and deactivate every handle.
    pub fn dispose(&self) {
        if self.inner.active.swap(false, Ordering::SeqCst) {
            self.inner.items.write().clear();
            self.inner.inflight.lock().take();
            tracing::info!("cart store disposed");
        }
    }

    pub(crate) fn ensure_active(&self) -> Result<(), CartError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(CartError::Inactive)
        }
    }

    // === Reads ===

    /// Snapshot of the cached line items.
    pub fn items(&self) -> Vec<LineItem> {
        self.inner.items.read().clone()
    }

    pub fn get(&self, id: &LineItemId) -> Option<LineItem> {
        self.inner.items.read().iter().find(|i| &i.id == id).cloned()
    }

    pub fn contains(&self, id: &LineItemId) -> bool {
        self.inner.items.read().iter().any(|i| &i.id == id)
    }

    /// Sum of quantities across all line items.
    pub fn item_count(&self) -> u32 {
        self.inner
            .items
            .read()
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Sum of unit price times quantity over the cached items.
    pub fn total(&self) -> Result<Money, CartError> {
        let items = self.inner.items.read();
        Ok(cart_total(&items, self.inner.currency)?)
    }

    // === Fetch ===

    /// Replace the local cart with the server's.
    ///
    /// Calls made while a fetch is running share its result. A 401 clears
    /// the session and returns [`CartError::SessionExpired`]; any other
    /// failure empties the cart, notifies the user and returns an empty list.
    #[tracing::instrument(skip_all)]
    pub async fn fetch(&self) -> Result<Vec<LineItem>, CartError> {
        match self.run_fetch(false).await {
            Err(e @ (CartError::SessionExpired | CartError::Inactive)) => Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "cart fetch failed, returning empty cart");
                Ok(Vec::new())
            }
            ok => ok,
        }
    }

    /// Fresh fetch that does not join an older in-flight request.
    ///
    /// Errors other than session expiry were already reported to the user.
    async fn reload(&self) -> FetchResult {
        self.run_fetch(true).await
    }

    /// Trailing reload after a mutation the server accepted.
    async fn settle(&self) -> Result<(), CartError> {
        match self.reload().await {
            Err(CartError::SessionExpired) => Err(CartError::SessionExpired),
            _ => Ok(()),
        }
    }

    async fn run_fetch(&self, fresh: bool) -> FetchResult {
        self.ensure_active()?;
        let fetch = self.start_fetch(fresh);
        let result = fetch.clone().await;

        let mut slot = self.inner.inflight.lock();
        if slot.as_ref().is_some_and(|f| f.ptr_eq(&fetch)) {
            *slot = None;
        }
        result
    }

    fn start_fetch(&self, fresh: bool) -> FetchFuture {
        let mut slot = self.inner.inflight.lock();
        if !fresh {
            if let Some(fetch) = slot.as_ref() {
                tracing::debug!("joining in-flight cart fetch");
                return fetch.clone();
            }
        }

        let seq = self.inner.started.fetch_add(1, Ordering::SeqCst) + 1;
        let api = Arc::clone(&self.inner.api);
        let store = self.downgrade();
        let fetch = async move {
            let result = api.list_cart().await;
            match store.upgrade() {
                Some(inner) => CartStore::from_inner(inner).apply_fetch(seq, result),
                None => Err(CartError::Inactive),
            }
        }
        .boxed()
        .shared();

        *slot = Some(fetch.clone());
        fetch
    }

    /// Store a fetch result unless a fetch started later was already applied.
    fn apply_fetch(
        &self,
        seq: u64,
        result: Result<Vec<LineItem>, trip_data::FetchError>,
    ) -> FetchResult {
        self.ensure_active()?;
        match result {
            Err(e) if e.is_unauthorized() => Err(self.expire()),
            Ok(fetched) => {
                let mut items = self.inner.items.write();
                if self.is_superseded(seq) {
                    tracing::debug!(seq, "discarding superseded cart fetch");
                    return Ok(items.clone());
                }
                tracing::debug!(count = fetched.len(), "cart fetched");
                *items = fetched.clone();
                Ok(fetched)
            }
            Err(e) => {
                {
                    let mut items = self.inner.items.write();
                    if self.is_superseded(seq) {
                        tracing::debug!(seq, error = %e, "ignoring failure of superseded cart fetch");
                        return Err(CartError::from(e));
                    }
                    items.clear();
                }
                tracing::error!(error = %e, "failed to fetch cart");
                self.inner.hooks.notify_error(format!("Failed to load cart: {e}"));
                Err(CartError::from(e))
            }
        }
    }

    /// Record `seq` as applied. True when a newer fetch already was.
    ///
    /// Callers hold the `items` write lock so the check and the write agree.
    fn is_superseded(&self, seq: u64) -> bool {
        self.inner.applied.fetch_max(seq, Ordering::SeqCst) > seq
    }

    /// Forget the cart and hand the user over to the login flow.
    fn expire(&self) -> CartError {
        self.inner.items.write().clear();
        self.inner.hooks.session_expired();
        CartError::SessionExpired
    }

    fn prune(&self, id: &LineItemId) {
        self.inner.items.write().retain(|i| &i.id != id);
    }

    // === Mutations ===

    /// Book `quantity` units of an activity, one request per unit.
    ///
    /// The activity is looked up first. Requests already accepted are kept
    /// when others fail; the report says which is which.
    #[tracing::instrument(skip_all, fields(activity_id = %activity_id, quantity = quantity))]
    pub async fn add(
        &self,
        activity_id: &ActivityId,
        quantity: u32,
        booking_date: Option<BookingDate>,
    ) -> Result<BatchReport, CartError> {
        self.ensure_active()?;
        if activity_id.is_blank() {
            return Err(CartError::Validation("activityId is required".into()));
        }
        let quantity = LineItem::validate_quantity(i64::from(quantity))?;

        match self.inner.api.get_activity(activity_id).await {
            Ok(activity) => tracing::debug!(title = %activity.title, "activity found"),
            Err(e) if e.is_unauthorized() => return Err(self.expire()),
            Err(e) => {
                tracing::warn!(error = %e, "activity lookup failed");
                return Err(CartError::NotFound(format!("Activity {activity_id}")));
            }
        }

        let requests = BookingRequest::expand(activity_id, quantity, booking_date);
        let api = &self.inner.api;
        let results = join_all(requests.iter().map(|r| api.add_to_cart(r))).await;

        let mut report = BatchReport::new();
        for (n, result) in results.into_iter().enumerate() {
            let target = format!("{activity_id}#{}", n + 1);
            match result {
                Ok(()) => report.push(target, BatchOutcome::Succeeded),
                Err(e) => {
                    tracing::warn!(unit = %target, error = %e, "add to cart failed");
                    report.push(target, BatchOutcome::Failed(e.into()));
                }
            }
        }

        if report.session_expired() {
            return Err(self.expire());
        }
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            total = report.total(),
            "added to cart"
        );

        self.settle().await?;
        report.into_result()
    }

    /// Remove a line item.
    ///
    /// An item the server no longer knows is pruned locally without error.
    #[tracing::instrument(skip_all, fields(line_item_id = %id))]
    pub async fn remove(&self, id: &LineItemId) -> Result<(), CartError> {
        self.ensure_active()?;
        if !self.contains(id) {
            tracing::warn!("line item not cached, pruning locally");
            self.prune(id);
            return self.settle().await;
        }

        self.reload().await?;
        self.delete_and_settle(id).await
    }

    /// Set a line item's quantity.
    ///
    /// Fails with [`CartError::NotFound`] when the item is gone after a fresh fetch.
    #[tracing::instrument(skip_all, fields(line_item_id = %id, quantity = quantity))]
    pub async fn update(&self, id: &LineItemId, quantity: u32) -> Result<(), CartError> {
        self.ensure_active()?;
        let quantity = LineItem::validate_quantity(i64::from(quantity))?;

        self.reload().await?;
        if !self.contains(id) {
            self.prune(id);
            return Err(CartError::NotFound(format!("Line item {id}")));
        }
        self.apply_update(id, quantity).await
    }

    /// Add one unit to a line item.
    #[tracing::instrument(skip_all, fields(line_item_id = %id))]
    pub async fn increase(&self, id: &LineItemId) -> Result<(), CartError> {
        self.ensure_active()?;
        let item = self.fresh_item(id).await?;
        let quantity = LineItem::validate_quantity(i64::from(item.quantity) + 1)?;
        self.apply_update(id, quantity).await
    }

    /// Take one unit off a line item, removing it when none would remain.
    #[tracing::instrument(skip_all, fields(line_item_id = %id))]
    pub async fn decrease(&self, id: &LineItemId) -> Result<(), CartError> {
        self.ensure_active()?;
        let item = self.fresh_item(id).await?;
        if item.quantity <= 1 {
            self.delete_and_settle(id).await
        } else {
            self.apply_update(id, item.quantity - 1).await
        }
    }

    /// Remove several line items with one request each.
    #[tracing::instrument(skip_all, fields(count = ids.len()))]
    pub async fn remove_many(&self, ids: &[LineItemId]) -> Result<BatchReport, CartError> {
        self.ensure_active()?;
        if ids.is_empty() {
            return Ok(BatchReport::new());
        }

        self.reload().await?;
        let outcomes = join_all(ids.iter().map(|id| self.delete_one(id))).await;

        let mut report = BatchReport::new();
        for (id, outcome) in ids.iter().zip(outcomes) {
            report.push(id.as_str(), outcome);
        }
        if report.session_expired() {
            return Err(self.expire());
        }
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            total = report.total(),
            "removed from cart"
        );

        self.settle().await?;
        report.into_result()
    }

    async fn fresh_item(&self, id: &LineItemId) -> Result<LineItem, CartError> {
        self.reload().await?;
        self.get(id)
            .ok_or_else(|| CartError::NotFound(format!("Line item {id}")))
    }

    async fn delete_one(&self, id: &LineItemId) -> BatchOutcome {
        match self.inner.api.delete_cart(id).await {
            Ok(()) => BatchOutcome::Succeeded,
            Err(e) if e.is_not_found() => {
                tracing::warn!(line_item_id = %id, "line item already gone on server, pruning");
                self.prune(id);
                BatchOutcome::Reconciled
            }
            Err(e) => {
                tracing::warn!(line_item_id = %id, error = %e, "delete failed");
                BatchOutcome::Failed(e.into())
            }
        }
    }

    async fn delete_and_settle(&self, id: &LineItemId) -> Result<(), CartError> {
        match self.delete_one(id).await {
            BatchOutcome::Succeeded => {
                tracing::info!(line_item_id = %id, "removed from cart");
                self.settle().await
            }
            BatchOutcome::Reconciled => Ok(()),
            BatchOutcome::Failed(CartError::SessionExpired) => Err(self.expire()),
            BatchOutcome::Failed(e) => Err(e),
        }
    }

    async fn apply_update(&self, id: &LineItemId, quantity: u32) -> Result<(), CartError> {
        match self.inner.api.update_cart(id, quantity).await {
            Ok(()) => {
                tracing::info!(line_item_id = %id, quantity, "cart quantity updated");
                self.settle().await
            }
            Err(e) if e.is_unauthorized() => Err(self.expire()),
            Err(e) if e.is_not_found() => {
                tracing::warn!(line_item_id = %id, "line item already gone on server, pruning");
                self.prune(id);
                Ok(())
            }
            Err(e) => {
                tracing::error!(line_item_id = %id, error = %e, "update failed");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("active", &self.is_active())
            .field("items", &self.inner.items.read().len())
            .field("currency", &self.inner.currency)
            .finish()
    }
}
