//! # Client crate: session and report state for FindMe front-ends
//!
//! Front-ends (the `findme` CLI, a browser shell) drive two owners of state:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`SessionStore`]: token persistence, restore/login/register/logout, the [`Authenticator`] capability |
//! | [`reports`] | [`ReportManager`]: CRUD against the backend with local reconciliation |
//! | [`filter`] | Pure name/location/status filtering and newest-first ordering |
//! | [`validation`] | Required-field checks and the [`ReportForm`] form state |
//! | [`outcome`] | [`Outcome`]: `Pending`, `Succeeded` or `Failed(reason)` per operation |
//! | [`liveness`] | [`Liveness`]: drop responses that arrive after the owner went away |
//! | [`settings`] | [`Settings`] from defaults, `findme.toml` and `FINDME_*` variables |
//! | `persistence` | [`make_token_store`]: the platform's token store |
//!
//! Both owners take `&mut self` for every mutating operation. Two requests
//! against the same owner therefore cannot overlap; callers await one before
//! issuing the next.

pub mod auth;
pub mod filter;
pub mod liveness;
pub mod outcome;
pub mod reports;
pub mod settings;
pub mod validation;

mod persistence;

pub use auth::{require_token, AuthState, Authenticator, RegisterStatus, SessionStore};
pub use filter::{filter, newest_first, Choice, ReportFilter};
pub use liveness::Liveness;
pub use outcome::Outcome;
pub use persistence::make_token_store;
pub use reports::{ReportCollection, ReportError, ReportManager, Scope};
pub use settings::Settings;
pub use validation::{
    missing_required, normalize_date, validate_required, FormFields, ReportForm,
    REQUIRED_REPORT_FIELDS,
};
