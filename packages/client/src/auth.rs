//! # Session store
//!
//! [`SessionStore`] is the single owner of "is a user logged in, and who". It
//! holds the bearer token and the profile `/auth/me` resolved for it, persists
//! the token through a [`TokenStore`], and exposes the session lifecycle:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`restore_session`](SessionStore::restore_session) | Validate the persisted token once at startup, then clear `initial_loading` |
//! | [`login`](SessionStore::login) | Exchange credentials for a token, persist it, resolve the user |
//! | [`register`](SessionStore::register) | Create an account; signs in when the server returns a token |
//! | [`fetch_current_user`](SessionStore::fetch_current_user) | Validate a token; any failure clears the session |
//! | [`logout`](SessionStore::logout) | Clear token and user locally, no request |
//!
//! A session counts as authenticated only when both token and user are set. A
//! persisted token that has not been validated yet is not enough.
//!
//! Consumers that only need the capability depend on [`Authenticator`].

use std::collections::HashMap;
use std::future::Future;

use api::{ApiError, Backend, Credentials, Operation, Registration, UserProfile};
use store::{KeyValueStore, TokenStore};

use crate::liveness::Liveness;
use crate::outcome::Outcome;

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    /// True until [`SessionStore::restore_session`] has finished. Protected views
    /// must wait for it.
    pub initial_loading: bool,
    /// A login or registration is in flight.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            initial_loading: true,
            loading: false,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// How a successful registration left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStatus {
    /// The server issued a token; the user is signed in.
    SignedIn,
    /// No token was issued; the caller should send the user to the login step.
    LoginRequired,
}

/// The session capability handed to consumers.
pub trait Authenticator {
    fn is_authenticated(&self) -> bool;

    fn user(&self) -> Option<&UserProfile>;

    fn token(&self) -> Option<&str>;

    fn login(&mut self, email: &str, password: &str) -> impl Future<Output = Outcome>;

    fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Outcome<RegisterStatus>>;

    fn logout(&mut self);
}

/// The bearer token of an authenticated session, or [`ApiError::Auth`].
///
/// Protected operations call this first so an unauthenticated attempt fails
/// without reaching the network.
pub fn require_token(auth: &impl Authenticator) -> Result<String, ApiError> {
    match auth.token() {
        Some(token) if auth.is_authenticated() => Ok(token.to_string()),
        _ => Err(ApiError::auth("You must be logged in to do that")),
    }
}

/// Message shown for a failed login or registration.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Network(_) => "Network error".to_string(),
        ApiError::Auth(message) | ApiError::Server { message, .. } if !message.trim().is_empty() => {
            message.clone()
        }
        _ => fallback.to_string(),
    }
}

/// Owner of the client session.
pub struct SessionStore<B, S: KeyValueStore> {
    backend: B,
    tokens: TokenStore<S>,
    state: AuthState,
    outcomes: HashMap<Operation, Outcome>,
    liveness: Liveness,
    restored: bool,
}

impl<B: Backend, S: KeyValueStore> SessionStore<B, S> {
    /// Read the persisted token (if any). The session stays unauthenticated
    /// until [`restore_session`](Self::restore_session) validates it.
    pub fn new(backend: B, tokens: TokenStore<S>) -> Self {
        let token = tokens.load();
        tracing::debug!(persisted = token.is_some(), "session store created");
        Self {
            backend,
            tokens,
            state: AuthState {
                token,
                ..AuthState::default()
            },
            outcomes: HashMap::new(),
            liveness: Liveness::new(),
            restored: false,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn initial_loading(&self) -> bool {
        self.state.initial_loading
    }

    /// Latest outcome of `op`, if it was ever attempted.
    pub fn outcome(&self, op: Operation) -> Option<&Outcome> {
        self.outcomes.get(&op)
    }

    /// Handle to end this store's lifetime; responses arriving afterwards are dropped.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn alive(&self, op: Operation) -> bool {
        let alive = self.liveness.is_alive();
        if !alive {
            tracing::debug!(%op, "session store gone, discarding response");
        }
        alive
    }

    fn record(&mut self, op: Operation, outcome: Outcome) {
        self.outcomes.insert(op, outcome);
    }

    fn clear_session(&mut self) {
        self.tokens.clear();
        self.state.token = None;
        self.state.user = None;
    }

    /// Validate the persisted token once. Later calls return immediately.
    pub async fn restore_session(&mut self) {
        if self.restored {
            tracing::debug!("session already restored");
            return;
        }
        self.restored = true;

        if let Some(token) = self.state.token.clone() {
            self.fetch_current_user(&token).await;
        }
        if self.liveness.is_alive() {
            self.state.initial_loading = false;
            tracing::info!(authenticated = self.is_authenticated(), "session restored");
        }
    }

    /// Validate `token`. On success the token is adopted and persisted and the
    /// profile stored. On any failure, network errors included, the session and
    /// the persisted token are cleared.
    pub async fn fetch_current_user(&mut self, token: &str) -> Option<UserProfile> {
        self.record(Operation::CurrentUser, Outcome::Pending);
        let result = self.backend.current_user(token).await;
        if !self.alive(Operation::CurrentUser) {
            return result.ok();
        }

        match result {
            Ok(user) => {
                if self.tokens.load().as_deref() != Some(token) {
                    self.tokens.save(token);
                }
                self.state.token = Some(token.to_string());
                self.state.user = Some(user.clone());
                self.record(Operation::CurrentUser, Outcome::Succeeded(()));
                tracing::info!(user = %user.id, "session validated");
                Some(user)
            }
            Err(err) => {
                tracing::warn!("token rejected, clearing session: {}", err);
                self.clear_session();
                self.record(Operation::CurrentUser, Outcome::Failed(err.user_message()));
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// Failures come back as [`Outcome::Failed`] with the server's message,
    /// `"Network error"`, or `"Login failed"`; they never propagate further.
    pub async fn login(&mut self, email: &str, password: &str) -> Outcome {
        self.record(Operation::Login, Outcome::Pending);
        self.state.loading = true;
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.backend.login(&credentials).await;
        if !self.alive(Operation::Login) {
            return Outcome::from(result.map(|_| ()));
        }

        let outcome = match result {
            Ok(response) => match response.token() {
                Some(token) => {
                    let token = token.to_string();
                    self.tokens.save(&token);
                    self.state.token = Some(token.clone());
                    tracing::info!("logged in");
                    self.fetch_current_user(&token).await;
                    Outcome::Succeeded(())
                }
                None => Outcome::Failed("No token received from server".to_string()),
            },
            Err(err) => {
                tracing::warn!("login failed: {}", err);
                Outcome::Failed(failure_message(&err, "Login failed"))
            }
        };

        if self.liveness.is_alive() {
            self.state.loading = false;
            self.record(Operation::Login, outcome.clone());
        }
        outcome
    }

    /// Create an account. When the server issues a token the session signs in
    /// as with [`login`](Self::login); otherwise it stays signed out and the
    /// result is [`RegisterStatus::LoginRequired`].
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Outcome<RegisterStatus> {
        self.record(Operation::Register, Outcome::Pending);
        self.state.loading = true;
        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.backend.register(&registration).await;
        if !self.alive(Operation::Register) {
            return Outcome::from(result.map(|_| RegisterStatus::LoginRequired));
        }

        let outcome = match result {
            Ok(response) => match response.token() {
                Some(token) => {
                    let token = token.to_string();
                    self.tokens.save(&token);
                    self.state.token = Some(token.clone());
                    tracing::info!("registered and logged in");
                    self.fetch_current_user(&token).await;
                    Outcome::Succeeded(RegisterStatus::SignedIn)
                }
                None => {
                    tracing::info!("registered, login required");
                    Outcome::Succeeded(RegisterStatus::LoginRequired)
                }
            },
            Err(err) => {
                tracing::warn!("registration failed: {}", err);
                Outcome::Failed(failure_message(&err, "Registration failed"))
            }
        };

        if self.liveness.is_alive() {
            self.state.loading = false;
            self.record(Operation::Register, outcome.settled());
        }
        outcome
    }

    /// Forget the session. Synchronous; nothing is sent to the server.
    pub fn logout(&mut self) {
        self.clear_session();
        tracing::info!("logged out");
    }
}

impl<B: Backend, S: KeyValueStore> Authenticator for SessionStore<B, S> {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn user(&self) -> Option<&UserProfile> {
        SessionStore::user(self)
    }

    fn token(&self) -> Option<&str> {
        SessionStore::token(self)
    }

    async fn login(&mut self, email: &str, password: &str) -> Outcome {
        SessionStore::login(self, email, password).await
    }

    async fn register(&mut self, name: &str, email: &str, password: &str) -> Outcome<RegisterStatus> {
        SessionStore::register(self, name, email, password).await
    }

    fn logout(&mut self) {
        SessionStore::logout(self)
    }
}
