//! Data models exchanged with the FindMe backend.

mod report;
mod responses;
mod user;

pub use report::{
    parse_timestamp, NewReport, Report, ReportId, ReportPatch, ReportStatus, UnknownStatus,
};
pub use responses::{
    AuthResponse, CreatedReport, Credentials, HealthStatus, Registration, SearchQuery,
};
pub(crate) use responses::{ErrorBody, Listing, Single};
pub use user::{UserId, UserProfile};
