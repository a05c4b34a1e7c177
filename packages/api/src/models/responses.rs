//! Request and response bodies of the auth, search and health endpoints, plus the
//! envelope shapes report endpoints answer with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::report::{Report, ReportId, ReportStatus};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login or registration response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl AuthResponse {
    /// The issued token, if any non-blank one was returned.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// What the client learns from a successful create.
///
/// The full canonical record is only obtainable by listing again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedReport {
    pub id: Option<ReportId>,
    pub status: Option<ReportStatus>,
}

impl CreatedReport {
    /// Read `id`/`status` from `{data: {...}}` or from the top level.
    pub fn from_body(body: &Value) -> Self {
        let record = body.get("data").filter(|d| d.is_object()).unwrap_or(body);
        Self {
            id: record.get("id").and_then(Value::as_i64),
            status: record
                .get("status")
                .and_then(|s| serde_json::from_value(s.clone()).ok()),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}

/// Server-side advanced search (`GET /search`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub status: Option<ReportStatus>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
}

impl SearchQuery {
    /// Query-string pairs, blank values omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let text = [
            ("name", &self.name),
            ("location", &self.location),
            ("gender", &self.gender),
        ];
        for (key, value) in text {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, v.to_string()));
            }
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(min) = self.age_min {
            params.push(("age_min", min.to_string()));
        }
        if let Some(max) = self.age_max {
            params.push(("age_max", max.to_string()));
        }
        params
    }

    /// The backend's matching rule: case-insensitive substring for text fields,
    /// inclusive age bounds, exact status.
    pub fn matches(&self, report: &Report) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }

        contains(&report.full_name, &self.name)
            && contains(&report.last_seen_location, &self.location)
            && contains(&report.gender, &self.gender)
            && self.status.map_or(true, |s| report.status == s)
            && self.age_min.map_or(true, |min| report.age.is_some_and(|a| a >= min))
            && self.age_max.map_or(true, |max| report.age.is_some_and(|a| a <= max))
    }
}

/// Error body: `{error}`, `{message}` or `{msg}` depending on which layer answered.
///
/// Schema validation answers with `{"error": {"field": ["reason", ..]}}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error
            .and_then(describe)
            .or(self.message)
            .or(self.msg)
            .filter(|m| !m.trim().is_empty())
    }
}

fn describe(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(describe).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(fields) => {
            let parts: Vec<String> = fields
                .into_iter()
                .filter_map(|(field, reason)| describe(reason).map(|r| format!("{field}: {r}")))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

/// `{data: [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing {
    Wrapped { data: Vec<Report> },
    Bare(Vec<Report>),
}

impl Listing {
    pub(crate) fn into_vec(self) -> Vec<Report> {
        match self {
            Listing::Wrapped { data } | Listing::Bare(data) => data,
        }
    }
}

/// `{data: {...}}` or a bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Single {
    Wrapped { data: Report },
    Bare(Report),
}

impl Single {
    pub(crate) fn into_report(self) -> Report {
        match self {
            Single::Wrapped { data } | Single::Bare(data) => data,
        }
    }

    /// The record, unless the body was only an acknowledgement.
    pub(crate) fn into_complete(self) -> Option<Report> {
        Some(self.into_report()).filter(Report::is_complete)
    }
}
