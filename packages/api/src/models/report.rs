//! # Missing-person reports
//!
//! One canonical schema is used everywhere inside the client. Field-name drift
//! between backend revisions is absorbed here, by serde, and nowhere else:
//!
//! | Wire name | Canonical field |
//! |-----------|-----------------|
//! | `name` | [`Report::full_name`] |
//! | `image_url` | [`Report::photo_url`] |
//! | `description` | [`Report::additional_info`] |
//!
//! Required string fields that arrive as `null` decode as empty strings and a
//! lowercase `status` (`"missing"`) decodes like its capitalised form.
//!
//! | Type | Used for |
//! |------|----------|
//! | [`Report`] | A record as listed or fetched. `id` and `case_number` are server-owned. |
//! | [`NewReport`] | Body of `POST /missing-persons`. |
//! | [`ReportPatch`] | Body of `PUT /missing-persons/:id`; mutable fields only, absent ones are not sent. |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned report identifier.
pub type ReportId = i64;

/// Case status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    #[serde(alias = "missing", alias = "MISSING")]
    Missing,
    #[serde(alias = "found", alias = "FOUND")]
    Found,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Missing => "Missing",
            ReportStatus::Found => "Found",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is neither `Missing` nor `Found`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ReportStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "missing" => Ok(ReportStatus::Missing),
            "found" => Ok(ReportStatus::Found),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A missing-person case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    #[serde(alias = "name", default, deserialize_with = "default_if_null")]
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub last_seen_location: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub last_seen_date: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub status: ReportStatus,
    #[serde(alias = "description", default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(alias = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub case_number: String,
    /// Creation timestamp as sent by the server, used for newest-first ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Report {
    /// Build a record from a submission and its server-assigned id.
    pub fn from_new(id: ReportId, new: NewReport) -> Self {
        Self {
            id,
            full_name: new.full_name,
            age: new.age,
            gender: new.gender,
            height: new.height,
            last_seen_location: new.last_seen_location,
            last_seen_date: new.last_seen_date,
            status: new.status,
            additional_info: new.additional_info,
            photo_url: new.photo_url,
            contact_name: new.contact_name,
            contact_phone: new.contact_phone,
            case_number: new.case_number,
            created_at: None,
        }
    }

    /// Merge the fields present in `patch`. `id` and `case_number` are never touched.
    ///
    /// A blank optional field in the patch clears that field.
    pub fn apply(&mut self, patch: &ReportPatch) {
        if let Some(v) = &patch.full_name {
            self.full_name = v.clone();
        }
        if let Some(v) = patch.age {
            self.age = Some(v);
        }
        if let Some(v) = &patch.gender {
            self.gender = v.clone();
        }
        if let Some(v) = &patch.height {
            self.height = non_blank(v);
        }
        if let Some(v) = &patch.last_seen_location {
            self.last_seen_location = v.clone();
        }
        if let Some(v) = &patch.last_seen_date {
            self.last_seen_date = v.clone();
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = &patch.additional_info {
            self.additional_info = non_blank(v);
        }
        if let Some(v) = &patch.photo_url {
            self.photo_url = non_blank(v);
        }
        if let Some(v) = &patch.contact_name {
            self.contact_name = v.clone();
        }
        if let Some(v) = &patch.contact_phone {
            self.contact_phone = v.clone();
        }
    }

    /// Whether this looks like a whole record rather than an acknowledgement
    /// such as `{"id": 5, "message": "Updated"}`.
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.case_number.trim().is_empty()
    }

    /// Case-insensitive match of `term` against name, location, contact and
    /// details, the fields the quick search covers.
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        [
            Some(self.full_name.as_str()),
            Some(self.last_seen_location.as_str()),
            Some(self.contact_name.as_str()),
            self.additional_info.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Parsed [`created_at`](Self::created_at), if present and well-formed.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Body of a report submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub last_seen_location: String,
    pub last_seen_date: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub case_number: String,
}

impl From<&Report> for NewReport {
    fn from(report: &Report) -> Self {
        Self {
            full_name: report.full_name.clone(),
            age: report.age,
            gender: report.gender.clone(),
            height: report.height.clone(),
            last_seen_location: report.last_seen_location.clone(),
            last_seen_date: report.last_seen_date.clone(),
            status: report.status,
            additional_info: report.additional_info.clone(),
            photo_url: report.photo_url.clone(),
            contact_name: report.contact_name.clone(),
            contact_phone: report.contact_phone.clone(),
            case_number: report.case_number.clone(),
        }
    }
}

/// Partial update of the mutable report fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl ReportPatch {
    /// Patch that only changes the status.
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Required fields this patch would set to a blank value.
    pub fn blank_fields(&self) -> Vec<String> {
        [
            ("full_name", &self.full_name),
            ("gender", &self.gender),
            ("last_seen_location", &self.last_seen_location),
            ("last_seen_date", &self.last_seen_date),
            ("contact_name", &self.contact_name),
            ("contact_phone", &self.contact_phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(key, _)| key.to_string())
        .collect()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse the timestamp formats the backend has been seen to emit.
///
/// Accepts RFC 3339, RFC 2822 (`Mon, 01 Jan 2024 10:00:00 GMT`), naive ISO
/// date-times separated by `T` or a space, and bare `YYYY-MM-DD` dates. Naive
/// values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_legacy_field_names() {
        let report: Report = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Amina Ali",
                "age": 20,
                "gender": null,
                "last_seen_location": "Mombasa",
                "status": "missing",
                "description": "Wearing a red scarf",
                "image_url": "https://img.example/amina.jpg"
            }"#,
        )
        .unwrap();

        assert_eq!(report.full_name, "Amina Ali");
        assert_eq!(report.gender, "");
        assert_eq!(report.status, ReportStatus::Missing);
        assert_eq!(report.additional_info.as_deref(), Some("Wearing a red scarf"));
        assert_eq!(report.photo_url.as_deref(), Some("https://img.example/amina.jpg"));
        assert_eq!(report.case_number, "");
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let report = Report::from_new(
            1,
            NewReport {
                full_name: "John Doe".into(),
                age: Some(34),
                gender: "Male".into(),
                height: None,
                last_seen_location: "Nairobi".into(),
                last_seen_date: "2024-03-01T00:00:00.000Z".into(),
                status: ReportStatus::Found,
                additional_info: None,
                photo_url: Some("p.jpg".into()),
                contact_name: "Jane".into(),
                contact_phone: "0700".into(),
                case_number: "C-1".into(),
            },
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["full_name"], "John Doe");
        assert_eq!(value["photo_url"], "p.jpg");
        assert_eq!(value["status"], "Found");
        assert!(value.get("height").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ReportPatch {
            full_name: Some("Mary N.".into()),
            ..ReportPatch::status(ReportStatus::Found)
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["status"], "Found");
        assert!(ReportPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_apply_keeps_server_owned_fields() {
        let mut report: Report =
            serde_json::from_str(r#"{"id": 9, "full_name": "Peter M.", "case_number": "K-9"}"#)
                .unwrap();
        let patch = ReportPatch {
            last_seen_location: Some("Meru".into()),
            age: Some(41),
            ..ReportPatch::default()
        };
        report.apply(&patch);

        assert_eq!(report.id, 9);
        assert_eq!(report.case_number, "K-9");
        assert_eq!(report.full_name, "Peter M.");
        assert_eq!(report.last_seen_location, "Meru");
        assert_eq!(report.age, Some(41));
    }

    #[test]
    fn test_blank_fields_lists_cleared_required_fields() {
        let patch = ReportPatch {
            full_name: Some("   ".into()),
            contact_phone: Some(String::new()),
            height: Some(String::new()),
            gender: Some("Female".into()),
            ..ReportPatch::default()
        };
        assert_eq!(patch.blank_fields(), ["full_name", "contact_phone"]);
        assert!(ReportPatch::status(ReportStatus::Found).blank_fields().is_empty());
    }

    #[test]
    fn test_acknowledgement_is_not_a_complete_record() {
        let ack: Report =
            serde_json::from_str(r#"{"id": 5, "message": "Updated successfully"}"#).unwrap();
        assert!(!ack.is_complete());

        let full: Report =
            serde_json::from_str(r#"{"id": 5, "full_name": "Peter M.", "case_number": "K-5"}"#)
                .unwrap();
        assert!(full.is_complete());
    }

    #[test]
    fn test_mentions_covers_quick_search_fields() {
        let report: Report = serde_json::from_str(
            r#"{"id": 1, "full_name": "Amina Ali", "last_seen_location": "Mombasa",
                "contact_name": "Fatuma", "description": "Red scarf"}"#,
        )
        .unwrap();
        assert!(report.mentions("amina"));
        assert!(report.mentions("MOMBASA"));
        assert!(report.mentions("fatu"));
        assert!(report.mentions(" scarf "));
        assert!(!report.mentions("Nairobi"));
        assert!(!report.mentions("  "));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("found".parse::<ReportStatus>(), Ok(ReportStatus::Found));
        assert_eq!(" Missing ".parse::<ReportStatus>(), Ok(ReportStatus::Missing));
        assert!("All".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 10:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("Fri, 05 Jan 2024 10:30:00 GMT"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-05"),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
