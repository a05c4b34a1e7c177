//! # The backend contract
//!
//! [`Backend`] is the only way the client reaches the FindMe REST API. Each
//! method corresponds to one endpoint:
//!
//! | Method | Endpoint | Auth |
//! |--------|----------|------|
//! | [`register`](Backend::register) | `POST /auth/register` | none |
//! | [`login`](Backend::login) | `POST /auth/login` | none |
//! | [`current_user`](Backend::current_user) | `GET /auth/me` | bearer |
//! | [`list_reports`](Backend::list_reports) | `GET /missing-persons` | none |
//! | [`list_my_reports`](Backend::list_my_reports) | `GET /missing-persons/mine` | bearer |
//! | [`get_report`](Backend::get_report) | `GET /missing-persons/:id` | none |
//! | [`create_report`](Backend::create_report) | `POST /missing-persons` | bearer |
//! | [`update_report`](Backend::update_report) | `PUT /missing-persons/:id` | bearer |
//! | [`delete_report`](Backend::delete_report) | `DELETE /missing-persons/:id` | bearer |
//! | [`search`](Backend::search) | `GET /search` | none |
//! | [`quick_search`](Backend::quick_search) | `GET /search/quick?q=` | none |
//! | [`health`](Backend::health) | `GET /health` | none |
//!
//! Implementations: [`crate::HttpBackend`] (reqwest) and [`crate::MemoryBackend`]
//! (in-process, for tests and offline use).

use std::fmt;
use std::future::Future;

use crate::error::ApiError;
use crate::models::{
    AuthResponse, CreatedReport, Credentials, HealthStatus, NewReport, Registration, Report,
    ReportId, ReportPatch, SearchQuery, UserProfile,
};

/// One row of the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Login,
    CurrentUser,
    ListReports,
    ListMyReports,
    GetReport,
    CreateReport,
    UpdateReport,
    DeleteReport,
    Search,
    QuickSearch,
    Health,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::CurrentUser => "current_user",
            Operation::ListReports => "list_reports",
            Operation::ListMyReports => "list_my_reports",
            Operation::GetReport => "get_report",
            Operation::CreateReport => "create_report",
            Operation::UpdateReport => "update_report",
            Operation::DeleteReport => "delete_report",
            Operation::Search => "search",
            Operation::QuickSearch => "quick_search",
            Operation::Health => "health",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Async access to the FindMe REST API.
pub trait Backend {
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>>;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>>;

    fn current_user(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<UserProfile, ApiError>>;

    fn list_reports(&self) -> impl Future<Output = Result<Vec<Report>, ApiError>>;

    fn list_my_reports(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<Report>, ApiError>>;

    fn get_report(
        &self,
        id: ReportId,
    ) -> impl Future<Output = Result<Report, ApiError>>;

    fn create_report(
        &self,
        report: &NewReport,
        token: &str,
    ) -> impl Future<Output = Result<CreatedReport, ApiError>>;

    /// Returns the updated record when the server sends one back.
    fn update_report(
        &self,
        id: ReportId,
        patch: &ReportPatch,
        token: &str,
    ) -> impl Future<Output = Result<Option<Report>, ApiError>>;

    fn delete_report(
        &self,
        id: ReportId,
        token: &str,
    ) -> impl Future<Output = Result<(), ApiError>>;

    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Report>, ApiError>>;

    /// Free-text search over name, location, contact and details. A blank
    /// term matches nothing.
    fn quick_search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Report>, ApiError>>;

    fn health(&self) -> impl Future<Output = Result<HealthStatus, ApiError>>;
}
