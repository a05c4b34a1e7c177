//! # Form validation
//!
//! Report create and edit forms are gated by [`validate_required`]: a field is
//! filled when its value, coerced to a string and trimmed, is non-empty. Numbers
//! are present or absent; their range is not checked here.
//!
//! [`ReportForm`] is the string-valued state behind both forms. It converts to a
//! [`NewReport`] for submission and to a [`ReportPatch`] for edits.

use std::borrow::Cow;
use std::collections::HashMap;

use api::{parse_timestamp, ApiError, NewReport, Report, ReportPatch, ReportStatus};
use chrono::{NaiveDate, SecondsFormat};
use serde_json::{Map, Value};

/// Fields that must be filled before a report is sent.
pub const REQUIRED_REPORT_FIELDS: &[&str] = &[
    "full_name",
    "age",
    "gender",
    "last_seen_location",
    "last_seen_date",
    "status",
    "contact_name",
    "contact_phone",
    "case_number",
];

/// Anything whose fields can be looked up by name as text.
pub trait FormFields {
    /// The field's value as text, or `None` when absent or null.
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl FormFields for HashMap<String, String> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl FormFields for Map<String, Value> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Names of the `required` fields that are empty, in `required` order.
pub fn missing_required<F: FormFields + ?Sized>(form: &F, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| {
            form.field(key)
                .map_or(true, |value| value.trim().is_empty())
        })
        .map(|key| key.to_string())
        .collect()
}

/// `true` when every `required` field is filled.
pub fn validate_required<F: FormFields + ?Sized>(form: &F, required: &[&str]) -> bool {
    missing_required(form, required).is_empty()
}

/// Text state of the report create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportForm {
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub last_seen_location: String,
    /// `YYYY-MM-DD` as entered in a date picker, or a full timestamp.
    pub last_seen_date: String,
    pub status: String,
    pub additional_info: String,
    pub photo_url: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub case_number: String,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            age: String::new(),
            gender: String::new(),
            height: String::new(),
            last_seen_location: String::new(),
            last_seen_date: String::new(),
            status: ReportStatus::Missing.to_string(),
            additional_info: String::new(),
            photo_url: String::new(),
            contact_name: String::new(),
            contact_phone: String::new(),
            case_number: String::new(),
        }
    }
}

impl FormFields for ReportForm {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value = match key {
            "full_name" => &self.full_name,
            "age" => &self.age,
            "gender" => &self.gender,
            "height" => &self.height,
            "last_seen_location" => &self.last_seen_location,
            "last_seen_date" => &self.last_seen_date,
            "status" => &self.status,
            "additional_info" => &self.additional_info,
            "photo_url" => &self.photo_url,
            "contact_name" => &self.contact_name,
            "contact_phone" => &self.contact_phone,
            "case_number" => &self.case_number,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn invalid(field: &str) -> ApiError {
    ApiError::Validation(vec![field.to_string()])
}

/// A date-picker value becomes midnight UTC; full timestamps are normalised.
pub fn normalize_date(raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    let parsed = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(_) => parse_timestamp(raw),
    };
    parsed
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| invalid("last_seen_date"))
}

impl ReportForm {
    /// Prefill the edit form from a held record.
    pub fn from_report(report: &Report) -> Self {
        let last_seen_date = parse_timestamp(&report.last_seen_date)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| report.last_seen_date.clone());
        Self {
            full_name: report.full_name.clone(),
            age: report.age.map(|a| a.to_string()).unwrap_or_default(),
            gender: report.gender.clone(),
            height: report.height.clone().unwrap_or_default(),
            last_seen_location: report.last_seen_location.clone(),
            last_seen_date,
            status: report.status.to_string(),
            additional_info: report.additional_info.clone().unwrap_or_default(),
            photo_url: report.photo_url.clone().unwrap_or_default(),
            contact_name: report.contact_name.clone(),
            contact_phone: report.contact_phone.clone(),
            case_number: report.case_number.clone(),
        }
    }

    /// Names of the required fields left empty.
    pub fn missing(&self) -> Vec<String> {
        missing_required(self, REQUIRED_REPORT_FIELDS)
    }

    fn check(&self) -> Result<(), ApiError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(missing))
        }
    }

    fn parsed_age(&self) -> Result<u32, ApiError> {
        self.age.trim().parse().map_err(|_| invalid("age"))
    }

    fn parsed_status(&self) -> Result<ReportStatus, ApiError> {
        self.status.parse().map_err(|_| invalid("status"))
    }

    /// Body for a new submission. Fails with [`ApiError::Validation`] naming
    /// the empty or malformed fields.
    pub fn to_new_report(&self) -> Result<NewReport, ApiError> {
        self.check()?;
        Ok(NewReport {
            full_name: self.full_name.trim().to_string(),
            age: Some(self.parsed_age()?),
            gender: self.gender.trim().to_string(),
            height: optional(&self.height),
            last_seen_location: self.last_seen_location.trim().to_string(),
            last_seen_date: normalize_date(&self.last_seen_date)?,
            status: self.parsed_status()?,
            additional_info: optional(&self.additional_info),
            photo_url: optional(&self.photo_url),
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            case_number: self.case_number.trim().to_string(),
        })
    }

    /// Patch carrying every mutable field of the form. `case_number` is never sent.
    ///
    /// Optional fields are always sent, so clearing one in the form clears it on
    /// the server.
    pub fn to_patch(&self) -> Result<ReportPatch, ApiError> {
        self.check()?;
        Ok(ReportPatch {
            full_name: Some(self.full_name.trim().to_string()),
            age: Some(self.parsed_age()?),
            gender: Some(self.gender.trim().to_string()),
            height: Some(self.height.trim().to_string()),
            last_seen_location: Some(self.last_seen_location.trim().to_string()),
            last_seen_date: Some(normalize_date(&self.last_seen_date)?),
            status: Some(self.parsed_status()?),
            additional_info: Some(self.additional_info.trim().to_string()),
            photo_url: Some(self.photo_url.trim().to_string()),
            contact_name: Some(self.contact_name.trim().to_string()),
            contact_phone: Some(self.contact_phone.trim().to_string()),
        })
    }
}
