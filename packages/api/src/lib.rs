//! # API crate: the FindMe REST contract
//!
//! Everything the client knows about the backend lives here: the wire models, the
//! error taxonomy, and two implementations of the [`Backend`] trait.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `Report`, `NewReport`, `ReportPatch`, `UserProfile` and request/response bodies; legacy field names are mapped here |
//! | [`error`] | [`ApiError`]: validation, auth, network, server, decode and config failures |
//! | [`backend`] | The [`Backend`] trait and the [`Operation`] enum naming each endpoint |
//! | `http` | [`HttpBackend`]: reqwest binding with bearer-token auth |
//! | `memory` | [`MemoryBackend`]: in-process implementation with test hooks |

pub mod backend;
pub mod error;
pub mod models;

mod http;
mod memory;

pub use backend::{Backend, Operation};
pub use error::ApiError;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use models::{
    parse_timestamp, AuthResponse, CreatedReport, Credentials, HealthStatus, NewReport,
    Registration, Report, ReportId, ReportPatch, ReportStatus, SearchQuery, UnknownStatus, UserId,
    UserProfile,
};
