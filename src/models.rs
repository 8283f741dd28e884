//! Data models for the roadmap dashboard.
//!
//! This module contains the typed records produced by the data source
//! and the cell value types (progress, dates) they are built from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Text shown in place of a value that is absent from the sheet.
pub const PLACEHOLDER: &str = "—";

/// Progress percentage as read from a sheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(Option<f64>);

impl Progress {
    /// Creates a known progress value.
    pub fn known(value: f64) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self(None)
        }
    }

    /// Creates an unknown progress value.
    pub fn unknown() -> Self {
        Self(None)
    }

    /// Parses a progress cell such as `40`, `"40"` or `"40%"`.
    ///
    /// Returns `None` for text that is not a number.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let number = number.replace(',', ".");
        number
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::known)
    }

    /// Returns the stored value, if any.
    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }
}

/// A date cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateValue {
    /// A date in one of the recognised layouts.
    Parsed(NaiveDate),
    /// Non-empty text that is not a recognised date, shown verbatim.
    Raw(String),
    #[default]
    Missing,
}

impl DateValue {
    const FORMATS: [&'static str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

    /// Parses a date cell, keeping unrecognised text as-is.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return DateValue::Missing;
        }

        Self::FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(DateValue::Parsed)
            .unwrap_or_else(|| DateValue::Raw(trimmed.to_string()))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateValue::Raw(text) => write!(f, "{}", text),
            DateValue::Missing => write!(f, "{}", PLACEHOLDER),
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateValue::Missing => serializer.serialize_none(),
            other => serializer.collect_str(other),
        }
    }
}

/// A top-level unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    /// Project name, the key stories refer to.
    pub name: String,
    /// Status label, passed through verbatim.
    pub status: String,
    /// Stored progress percentage.
    pub progress: Progress,
}

/// A user story belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    /// Story identifier, unique within its project.
    pub id: String,
    /// Name of the parent project.
    pub project: String,
    pub description: String,
    pub status: String,
    pub progress: Progress,
    pub start_date: DateValue,
    /// Expected completion date.
    pub due_date: DateValue,
    /// Optional reference link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Anything that carries a progress percentage.
pub trait Tracked {
    fn progress(&self) -> Progress;
}

impl Tracked for Project {
    fn progress(&self) -> Progress {
        self.progress
    }
}

impl Tracked for Story {
    fn progress(&self) -> Progress {
        self.progress
    }
}

/// Progress prepared for a progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentComplete {
    /// Stored value clamped to [0, 100]; 0 when unknown.
    pub value: f64,
    /// False when the stored value was missing or not a number.
    pub known: bool,
}

impl PercentComplete {
    /// Formats the value for display, e.g. `40%` or `unknown`.
    pub fn label(&self) -> String {
        if self.known {
            format!("{:.0}%", self.value)
        } else {
            "unknown".to_string()
        }
    }
}

/// Kind of problem found in a sheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldIssueKind {
    /// The column is absent or the cell is empty.
    Missing,
    /// The cell holds a value of the wrong shape.
    Invalid,
}

impl fmt::Display for FieldIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssueKind::Missing => write!(f, "missing"),
            FieldIssueKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// A cell that was degraded to a placeholder during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Sheet the record came from.
    pub sheet: String,
    /// Data row number (1-indexed, header excluded).
    pub row: usize,
    /// Column header that was looked up.
    pub field: String,
    pub kind: FieldIssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {}: {} value for '{}'",
            self.sheet, self.row, self.kind, self.field
        )
    }
}
