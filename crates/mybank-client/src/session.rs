//! Session context.
//!
//! A [`Session`] is the single owner of everything that describes "who is
//! logged in": the durable [`TokenStore`], the observable [`SessionStore`]
//! with the current user, and the [`Navigator`] that moves the front end
//! between the authenticated and unauthenticated areas.
//!
//! The API client never reaches into the session directly. It is handed a
//! [`SessionSink`] at construction and reports two events through it:
//! refreshed tokens and an invalidated session.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::models::User;
use crate::store::{StoreError, TokenPair, TokenStore};

/// Callbacks through which the API client reports token lifecycle events.
#[async_trait]
pub trait SessionSink: Send + Sync {
    /// A refresh produced a new pair; persist it.
    ///
    /// An error here means the durable copy could not be updated. The client
    /// treats that as a failed refresh and ends the session.
    async fn on_tokens_refreshed(&self, tokens: &TokenPair) -> Result<(), StoreError>;

    /// The session can no longer be recovered. Implementations clear all
    /// persisted credentials and user state.
    async fn on_session_invalidated(&self);
}

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Observable holder of the current user.
///
/// `is_authenticated` is always derived from the user being present, so the
/// two fields can never disagree.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state }
    }

    pub fn set_user(&self, user: User) {
        self.state.send_replace(SessionState {
            user: Some(user),
            is_authenticated: true,
        });
    }

    pub fn clear_user(&self) {
        self.state.send_replace(SessionState::default());
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Receives every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

/// Front-end destinations the session can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry point.
    Login,
    /// Authenticated landing area.
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Moves the presentation layer to a route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only remembers where it was last sent.
#[derive(Debug)]
pub struct RouteTracker {
    current: Mutex<Route>,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self {
            current: Mutex::new(Route::Login),
        }
    }
}

impl RouteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = route.path(), "Navigating");
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = route;
    }
}

/// Explicitly owned session context.
pub struct Session {
    tokens: Arc<dyn TokenStore>,
    state: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            tokens,
            state: SessionStore::new(),
            navigator,
        }
    }

    pub fn state(&self) -> &SessionStore {
        &self.state
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Reads the persisted token pair.
    pub async fn persisted_tokens(&self) -> Result<Option<TokenPair>, StoreError> {
        self.tokens.load().await
    }

    /// Persists a freshly issued pair and publishes the user.
    pub async fn establish(&self, tokens: &TokenPair, user: User) -> Result<(), StoreError> {
        self.tokens.save(tokens).await?;
        self.state.set_user(user);
        Ok(())
    }

    /// Clears persisted tokens and the user without navigating.
    pub async fn clear(&self) {
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted tokens");
        }
        self.state.clear_user();
    }

    /// Clears everything and sends the front end to the login route.
    pub async fn teardown(&self) {
        self.clear().await;
        self.navigator.navigate(Route::Login);
        tracing::info!("Session ended");
    }
}

#[async_trait]
impl SessionSink for Session {
    async fn on_tokens_refreshed(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.tokens.save(tokens).await
    }

    async fn on_session_invalidated(&self) {
        self.teardown().await;
    }
}
