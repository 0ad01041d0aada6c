//! Shared fixtures for cart integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use trip_cache::CredentialStore;
use trip_cart::{
    CartApi, CartStore, Navigator, Notification, NotificationLevel, Notifier, Route,
    SessionConfig, SessionHooks,
};
use trip_commerce::booking::BookingRequest;
use trip_commerce::cart::{Activity, LineItem};
use trip_commerce::{ActivityId, Currency, LineItemId, Money};
use trip_data::FetchError;

pub fn idr(amount: i64) -> Money {
    Money::new(amount, Currency::IDR)
}

/// A request received by [`FakeCartApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    GetActivity(String),
    Add(serde_json::Value),
    Update(String, u32),
    Delete(String),
}

#[derive(Default)]
struct State {
    items: Vec<LineItem>,
    activities: HashMap<String, Activity>,
    calls: Vec<Call>,
    unauthorized: bool,
    fail_list: bool,
    gone: HashSet<String>,
    fail_add_at: Option<usize>,
    adds: usize,
    next_id: u64,
    list_delay: Option<Duration>,
    stale_list_delay: Option<Duration>,
}

/// In-memory stand-in for the booking backend.
#[derive(Default)]
pub struct FakeCartApi {
    state: Mutex<State>,
}

impl FakeCartApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_activity(&self, id: &str, price: i64, discounted: Option<i64>) {
        self.state.lock().activities.insert(
            id.to_string(),
            Activity {
                id: ActivityId::new(id),
                title: format!("Activity {id}"),
                price: idr(price),
                discounted_price: discounted.map(idr),
            },
        );
    }

    /// Put a line item straight into the server-side cart.
    pub fn with_item(&self, id: &str, activity: &str, quantity: u32) {
        let mut state = self.state.lock();
        let item = state.line_item(LineItemId::new(id), activity, quantity);
        state.items.push(item);
    }

    /// Every request answers 401.
    pub fn set_unauthorized(&self, unauthorized: bool) {
        self.state.lock().unauthorized = unauthorized;
    }

    /// Listing the cart answers 500.
    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().fail_list = fail;
    }

    /// The item disappears server-side the moment it is touched: update and
    /// delete answer 404 and the listing no longer contains it.
    pub fn mark_gone(&self, id: &str) {
        self.state.lock().gone.insert(id.to_string());
    }

    /// The `n`th add-to-cart request (1-based) answers 500.
    pub fn fail_add_at(&self, n: usize) {
        self.state.lock().fail_add_at = Some(n);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.state.lock().list_delay = Some(delay);
    }

    /// The next list reads the cart immediately but answers after `delay`.
    pub fn delay_next_list_reply(&self, delay: Duration) {
        self.state.lock().stale_list_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn server_items(&self) -> Vec<LineItem> {
        self.state.lock().items.clone()
    }
}

impl State {
    fn line_item(&self, id: LineItemId, activity: &str, quantity: u32) -> LineItem {
        let (price, discounted) = self
            .activities
            .get(activity)
            .map(|a| (a.price, a.discounted_price))
            .unwrap_or((idr(0), None));
        let mut item = LineItem::new(id, ActivityId::new(activity), quantity, price);
        item.discounted_price = discounted;
        item
    }

    fn check_auth(&self) -> Result<(), FetchError> {
        if self.unauthorized {
            Err(FetchError::Api {
                code: 401,
                message: "Unauthorized".into(),
            })
        } else {
            Ok(())
        }
    }

    fn take_gone(&mut self, id: &LineItemId) -> Result<(), FetchError> {
        if self.gone.remove(id.as_str()) {
            self.items.retain(|i| &i.id != id);
            return Err(not_found());
        }
        if !self.items.iter().any(|i| &i.id == id) {
            return Err(not_found());
        }
        Ok(())
    }
}

fn not_found() -> FetchError {
    FetchError::Api {
        code: 404,
        message: "Cart not found".into(),
    }
}

#[async_trait]
impl CartApi for FakeCartApi {
    async fn list_cart(&self) -> Result<Vec<LineItem>, FetchError> {
        let (delay, snapshot) = {
            let mut state = self.state.lock();
            state.calls.push(Call::List);
            match state.stale_list_delay.take() {
                Some(delay) => (Some(delay), Some(state.items.clone())),
                None => (state.list_delay, None),
            }
        };
        if let (Some(delay), Some(items)) = (delay, snapshot) {
            tokio::time::sleep(delay).await;
            return Ok(items);
        }
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        state.check_auth()?;
        if state.fail_list {
            return Err(FetchError::Api {
                code: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(state.items.clone())
    }

    async fn get_activity(&self, id: &ActivityId) -> Result<Activity, FetchError> {
        let mut state = self.state.lock();
        state.calls.push(Call::GetActivity(id.to_string()));
        state.check_auth()?;
        state
            .activities
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Api {
                code: 404,
                message: "Activity not found".into(),
            })
    }

    async fn add_to_cart(&self, request: &BookingRequest) -> Result<(), FetchError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::Add(serde_json::to_value(request).unwrap()));
        state.check_auth()?;

        state.adds += 1;
        if state.fail_add_at == Some(state.adds) {
            return Err(FetchError::Api {
                code: 500,
                message: "boom".into(),
            });
        }

        state.next_id += 1;
        let id = LineItemId::new(format!("li-{}", state.next_id));
        let mut item = state.line_item(id, request.activity_id.as_str(), request.quantity);
        item.booking_date = request.booking_date;
        state.items.push(item);
        Ok(())
    }

    async fn update_cart(&self, id: &LineItemId, quantity: u32) -> Result<(), FetchError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Update(id.to_string(), quantity));
        state.check_auth()?;
        state.take_gone(id)?;
        if let Some(item) = state.items.iter_mut().find(|i| &i.id == id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_cart(&self, id: &LineItemId) -> Result<(), FetchError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Delete(id.to_string()));
        state.check_auth()?;
        state.take_gone(id)?;
        state.items.retain(|i| &i.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.with_level(NotificationLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.with_level(NotificationLevel::Success)
    }

    fn with_level(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

/// A store wired to fakes, with a signed-in user.
pub struct Harness {
    pub api: Arc<FakeCartApi>,
    pub store: CartStore,
    pub credentials: CredentialStore,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness() -> Harness {
    harness_with(SessionConfig::default())
}

pub fn harness_with(config: SessionConfig) -> Harness {
    let api = FakeCartApi::new();
    let credentials = CredentialStore::in_memory();
    credentials.set_token("token").unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());

    let hooks = SessionHooks::new(credentials.clone(), notifier.clone(), navigator.clone())
        .with_config(config);
    let store = CartStore::new(api.clone(), hooks);

    Harness {
        api,
        store,
        credentials,
        notifier,
        navigator,
    }
}
