//! # HTTP binding: reqwest client for the FindMe REST API
//!
//! [`HttpBackend`] owns a base URL (deployment configuration, e.g.
//! `https://findme-l00y.onrender.com/api`) and a `reqwest::Client`. Protected
//! endpoints get an `Authorization: Bearer <token>` header.
//!
//! ## Response mapping
//!
//! | Outcome | Result |
//! |---------|--------|
//! | transport failure (DNS, refused, timeout) | [`ApiError::Network`] |
//! | `401` | [`ApiError::Auth`] with the body's message |
//! | other non-2xx | [`ApiError::Server`] with status and `{error\|message\|msg}` text |
//! | 2xx with an undecodable body | [`ApiError::Decode`] |
//!
//! An update answered with a bare acknowledgement (no full record) yields
//! `None` rather than a half-empty [`Report`].
//!
//! No request is retried.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{Backend, Operation};
use crate::error::ApiError;
use crate::models::{
    AuthResponse, CreatedReport, Credentials, ErrorBody, HealthStatus, Listing, NewReport,
    Registration, Report, ReportId, ReportPatch, SearchQuery, Single, UserProfile,
};

/// Backend reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for `base_url` without a request timeout.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a backend for `base_url`. The timeout is ignored on wasm, where
    /// the browser owns request lifetimes.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        };
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, op: Operation, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%op, "request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(%op, status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Auth(message))
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Decode a JSON body. An empty body decodes as `null`.
    async fn body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Null).map_err(|e| ApiError::Decode(e.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Backend for HttpBackend {
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/auth/register")).json(registration);
        let response = self.send(Operation::Register, request).await?;
        let body: Option<AuthResponse> = Self::body(response).await?;
        Ok(body.unwrap_or_default())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        let response = self.send(Operation::Login, request).await?;
        Self::body(response).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self.client.get(self.url("/auth/me")).bearer_auth(token);
        let response = self.send(Operation::CurrentUser, request).await?;
        Self::body(response).await
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        let request = self.client.get(self.url("/missing-persons"));
        let response = self.send(Operation::ListReports, request).await?;
        let listing: Listing = Self::body(response).await?;
        Ok(listing.into_vec())
    }

    async fn list_my_reports(&self, token: &str) -> Result<Vec<Report>, ApiError> {
        let request = self
            .client
            .get(self.url("/missing-persons/mine"))
            .bearer_auth(token);
        let response = self.send(Operation::ListMyReports, request).await?;
        let listing: Listing = Self::body(response).await?;
        Ok(listing.into_vec())
    }

    async fn get_report(&self, id: ReportId) -> Result<Report, ApiError> {
        let request = self.client.get(self.url(&format!("/missing-persons/{id}")));
        let response = self.send(Operation::GetReport, request).await?;
        let single: Single = Self::body(response).await?;
        Ok(single.into_report())
    }

    async fn create_report(&self, report: &NewReport, token: &str) -> Result<CreatedReport, ApiError> {
        let request = self
            .client
            .post(self.url("/missing-persons"))
            .bearer_auth(token)
            .json(report);
        let response = self.send(Operation::CreateReport, request).await?;
        let body: Value = Self::body(response).await?;
        Ok(CreatedReport::from_body(&body))
    }

    async fn update_report(
        &self,
        id: ReportId,
        patch: &ReportPatch,
        token: &str,
    ) -> Result<Option<Report>, ApiError> {
        let request = self
            .client
            .put(self.url(&format!("/missing-persons/{id}")))
            .bearer_auth(token)
            .json(patch);
        let response = self.send(Operation::UpdateReport, request).await?;
        let body: Value = Self::body(response).await?;
        Ok(serde_json::from_value::<Single>(body)
            .ok()
            .and_then(Single::into_complete))
    }

    async fn delete_report(&self, id: ReportId, token: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/missing-persons/{id}")))
            .bearer_auth(token);
        self.send(Operation::DeleteReport, request).await?;
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Report>, ApiError> {
        let request = self
            .client
            .get(self.url("/search"))
            .query(&query.to_params());
        let response = self.send(Operation::Search, request).await?;
        let listing: Listing = Self::body(response).await?;
        Ok(listing.into_vec())
    }

    async fn quick_search(&self, term: &str) -> Result<Vec<Report>, ApiError> {
        let request = self
            .client
            .get(self.url("/search/quick"))
            .query(&[("q", term.trim())]);
        let response = self.send(Operation::QuickSearch, request).await?;
        let listing: Listing = Self::body(response).await?;
        Ok(listing.into_vec())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.client.get(self.url("/health"));
        let response = self.send(Operation::Health, request).await?;
        Self::body(response).await
    }
}
