//! User-facing side effects: notifications, navigation and session expiry.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use trip_cache::CredentialStore;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Shows notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Views the client can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Cart,
    Checkout,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Cart => "/cart",
            Route::Checkout => "/checkout",
            Route::Login => "/login",
        }
    }
}

/// Moves the user to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Session behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause between the session-expired notification and the login redirect.
    pub login_redirect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_redirect_delay: Duration::from_millis(1500),
        }
    }
}

/// Side-effect collaborators shared by the store and the page controllers.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct SessionHooks {
    credentials: CredentialStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    config: SessionConfig,
}

impl SessionHooks {
    pub fn new(
        credentials: CredentialStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            credentials,
            notifier,
            navigator,
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(route = route.path(), "navigating");
        self.navigator.navigate(route);
    }

    /// Clear credentials, tell the user, and send them to login after the configured delay.
    ///
    /// Must be called from within a Tokio runtime when the delay is non-zero.
    pub fn session_expired(&self) {
        tracing::warn!("session expired, clearing credentials");
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = %e, "failed to clear credentials");
        }
        self.notify_error("Your session has expired. Please log in again.");

        let delay = self.config.login_redirect_delay;
        if delay.is_zero() {
            self.navigate(Route::Login);
            return;
        }

        let navigator = Arc::clone(&self.navigator);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(route = Route::Login.path(), "navigating");
            navigator.navigate(Route::Login);
        });
    }
}

impl std::fmt::Debug for SessionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHooks")
            .field("authenticated", &self.credentials.is_authenticated())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        notifications: Mutex<Vec<Notification>>,
        routes: Mutex<Vec<Route>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            self.notifications.lock().push(notification);
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, route: Route) {
            self.routes.lock().push(route);
        }
    }

    fn hooks(delay: Duration) -> (SessionHooks, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let credentials = CredentialStore::in_memory();
        credentials.set_token("tok").unwrap();
        let hooks = SessionHooks::new(credentials, recorder.clone(), recorder.clone())
            .with_config(SessionConfig {
                login_redirect_delay: delay,
            });
        (hooks, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expired_redirects_after_delay() {
        let (hooks, recorder) = hooks(Duration::from_millis(1500));

        hooks.session_expired();
        assert!(!hooks.credentials().is_authenticated());
        assert_eq!(recorder.notifications.lock()[0].level, NotificationLevel::Error);
        assert!(recorder.routes.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(*recorder.routes.lock(), vec![Route::Login]);
    }

    #[test]
    fn test_session_expired_without_delay() {
        let (hooks, recorder) = hooks(Duration::ZERO);
        hooks.session_expired();
        assert_eq!(*recorder.routes.lock(), vec![Route::Login]);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Cart.path(), "/cart");
        assert_eq!(Route::Checkout.path(), "/checkout");
        assert_eq!(Route::Login.path(), "/login");
    }
}
