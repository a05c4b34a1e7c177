//! # In-process backend
//!
//! [`MemoryBackend`] implements the whole [`Backend`] contract against state held
//! in memory. It mirrors the reference server closely enough to exercise the
//! session and report logic without a network:
//!
//! - accounts with passwords, opaque bearer tokens issued on login/registration;
//! - `401` for missing or unknown tokens, `403` when touching another user's report,
//!   `404` for unknown report ids, `400` for incomplete or duplicate registrations;
//! - deterministic, increasing `created_at` timestamps;
//! - quick search over name, location, contact and details.
//!
//! Test hooks: [`request_count`](MemoryBackend::request_count) counts every call
//! (successful or not), [`fail_next`](MemoryBackend::fail_next) injects a one-shot
//! failure for an [`Operation`], [`set_offline`](MemoryBackend::set_offline) makes
//! every call a [`ApiError::Network`], [`with_latency`](MemoryBackend::with_latency)
//! delays each call, and [`set_register_issues_token`](MemoryBackend::set_register_issues_token)
//! controls whether registration logs the user in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::DateTime;

use crate::backend::{Backend, Operation};
use crate::error::ApiError;
use crate::models::{
    AuthResponse, CreatedReport, Credentials, HealthStatus, NewReport, Registration, Report,
    ReportId, ReportPatch, SearchQuery, UserId, UserProfile,
};

const EPOCH_SECS: i64 = 1_700_000_000;

#[derive(Debug)]
struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Debug)]
struct Stored {
    owner: i64,
    report: Report,
}

#[derive(Debug)]
struct State {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    reports: Vec<Stored>,
    next_user: i64,
    next_report: ReportId,
    next_token: u64,
    clock: i64,
    requests: usize,
    failures: HashMap<Operation, ApiError>,
    offline: bool,
    register_issues_token: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            tokens: HashMap::new(),
            reports: Vec::new(),
            next_user: 1,
            next_report: 1,
            next_token: 1,
            clock: 0,
            requests: 0,
            failures: HashMap::new(),
            offline: false,
            register_issues_token: true,
        }
    }
}

impl State {
    fn issue_token(&mut self, user: i64) -> String {
        let token = format!("mem-token-{}-{}", user, self.next_token);
        self.next_token += 1;
        self.tokens.insert(token.clone(), user);
        token
    }

    fn authenticate(&self, token: &str) -> Result<i64, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::auth("authentication token is required"));
        }
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| ApiError::auth("invalid authentication token"))
    }

    fn tick(&mut self) -> String {
        self.clock += 1;
        DateTime::from_timestamp(EPOCH_SECS + self.clock, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    }

    fn owned_mut(&mut self, id: ReportId, user: i64) -> Result<&mut Stored, ApiError> {
        let stored = self
            .reports
            .iter_mut()
            .find(|s| s.report.id == id)
            .ok_or_else(|| ApiError::server(404, "Not found"))?;
        if stored.owner != user {
            return Err(ApiError::server(403, "You can only modify your own reports"));
        }
        Ok(stored)
    }
}

/// In-memory Backend for testing and offline use.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it is served.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an account directly and return its profile.
    pub fn seed_user(&self, name: &str, email: &str, password: &str) -> UserProfile {
        let mut state = self.state();
        let id = state.next_user;
        state.next_user += 1;
        let profile = UserProfile {
            id: UserId::Number(id),
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            created_at: None,
        };
        state.accounts.push(Account {
            profile: profile.clone(),
            password: password.to_string(),
        });
        profile
    }

    /// Issue a token for an existing account, as a login would.
    pub fn token_for(&self, email: &str) -> Option<String> {
        let mut state = self.state();
        let user = state
            .accounts
            .iter()
            .find(|a| a.profile.email.as_deref() == Some(email))
            .and_then(|a| match a.profile.id {
                UserId::Number(n) => Some(n),
                UserId::Text(_) => None,
            })?;
        Some(state.issue_token(user))
    }

    /// Store a report owned by the holder of `token`.
    pub fn seed_report(&self, report: NewReport, token: &str) -> Result<Report, ApiError> {
        let mut state = self.state();
        let owner = state.authenticate(token)?;
        let id = state.next_report;
        state.next_report += 1;
        let mut stored = Report::from_new(id, report);
        stored.created_at = Some(state.tick());
        state.reports.push(Stored {
            owner,
            report: stored.clone(),
        });
        Ok(stored)
    }

    /// Invalidate a token, as an expiry would.
    pub fn revoke(&self, token: &str) {
        self.state().tokens.remove(token);
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: Operation, error: ApiError) {
        self.state().failures.insert(op, error);
    }

    /// While offline every call fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn set_register_issues_token(&self, issues: bool) {
        self.state().register_issues_token = issues;
    }

    /// Number of calls served so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.state().requests
    }

    /// Snapshot of every stored report, in insertion order.
    pub fn reports(&self) -> Vec<Report> {
        self.state().reports.iter().map(|s| s.report.clone()).collect()
    }

    /// Wait out the latency, then count the call and apply failure hooks.
    async fn begin(&self, op: Operation) -> Result<MutexGuard<'_, State>, ApiError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state();
        state.requests += 1;
        tracing::debug!(%op, "memory backend call");
        if state.offline {
            return Err(ApiError::Network("backend unreachable".to_string()));
        }
        if let Some(error) = state.failures.remove(&op) {
            return Err(error);
        }
        Ok(state)
    }
}

impl Backend for MemoryBackend {
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let mut state = self.begin(Operation::Register).await?;
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(ApiError::server(400, "name, email and password are required"));
        }
        if state
            .accounts
            .iter()
            .any(|a| a.profile.email.as_deref() == Some(registration.email.as_str()))
        {
            return Err(ApiError::server(400, "a user with this email already exists"));
        }

        let id = state.next_user;
        state.next_user += 1;
        state.accounts.push(Account {
            profile: UserProfile {
                id: UserId::Number(id),
                name: Some(registration.name.clone()),
                email: Some(registration.email.clone()),
                created_at: None,
            },
            password: registration.password.clone(),
        });

        let token = if state.register_issues_token {
            Some(state.issue_token(id))
        } else {
            None
        };
        Ok(AuthResponse {
            token,
            message: Some("user registered successfully".to_string()),
            user_id: Some(id.into()),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let mut state = self.begin(Operation::Login).await?;
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(ApiError::server(400, "email and password are required"));
        }
        let user = state
            .accounts
            .iter()
            .find(|a| {
                a.profile.email.as_deref() == Some(credentials.email.as_str())
                    && a.password == credentials.password
            })
            .map(|a| a.profile.id.clone());
        let Some(UserId::Number(id)) = user else {
            return Err(ApiError::auth("invalid email or password"));
        };
        Ok(AuthResponse {
            token: Some(state.issue_token(id)),
            message: Some("login successful".to_string()),
            user_id: Some(id.into()),
        })
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let state = self.begin(Operation::CurrentUser).await?;
        let user = state.authenticate(token)?;
        state
            .accounts
            .iter()
            .find(|a| a.profile.id == UserId::Number(user))
            .map(|a| a.profile.clone())
            .ok_or_else(|| ApiError::server(404, "user not found"))
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        let state = self.begin(Operation::ListReports).await?;
        Ok(state.reports.iter().map(|s| s.report.clone()).collect())
    }

    async fn list_my_reports(&self, token: &str) -> Result<Vec<Report>, ApiError> {
        let state = self.begin(Operation::ListMyReports).await?;
        let user = state.authenticate(token)?;
        Ok(state
            .reports
            .iter()
            .filter(|s| s.owner == user)
            .map(|s| s.report.clone())
            .collect())
    }

    async fn get_report(&self, id: ReportId) -> Result<Report, ApiError> {
        let state = self.begin(Operation::GetReport).await?;
        state
            .reports
            .iter()
            .find(|s| s.report.id == id)
            .map(|s| s.report.clone())
            .ok_or_else(|| ApiError::server(404, "Not found"))
    }

    async fn create_report(&self, report: &NewReport, token: &str) -> Result<CreatedReport, ApiError> {
        let mut state = self.begin(Operation::CreateReport).await?;
        let owner = state.authenticate(token)?;
        let id = state.next_report;
        state.next_report += 1;
        let mut stored = Report::from_new(id, report.clone());
        stored.created_at = Some(state.tick());
        let status = stored.status;
        state.reports.push(Stored {
            owner,
            report: stored,
        });
        Ok(CreatedReport {
            id: Some(id),
            status: Some(status),
        })
    }

    async fn update_report(
        &self,
        id: ReportId,
        patch: &ReportPatch,
        token: &str,
    ) -> Result<Option<Report>, ApiError> {
        let mut state = self.begin(Operation::UpdateReport).await?;
        let user = state.authenticate(token)?;
        let stored = state.owned_mut(id, user)?;
        stored.report.apply(patch);
        Ok(Some(stored.report.clone()))
    }

    async fn delete_report(&self, id: ReportId, token: &str) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::DeleteReport).await?;
        let user = state.authenticate(token)?;
        state.owned_mut(id, user)?;
        state.reports.retain(|s| s.report.id != id);
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Report>, ApiError> {
        let state = self.begin(Operation::Search).await?;
        Ok(state
            .reports
            .iter()
            .map(|s| &s.report)
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    async fn quick_search(&self, term: &str) -> Result<Vec<Report>, ApiError> {
        let state = self.begin(Operation::QuickSearch).await?;
        Ok(state
            .reports
            .iter()
            .map(|s| &s.report)
            .filter(|r| r.mentions(term))
            .cloned()
            .collect())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let _state = self.begin(Operation::Health).await?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            database: Some("in-memory".to_string()),
            message: None,
        })
    }
}
