//! Report generation.
//!
//! Wraps a view model with run metadata and data-quality notes and
//! renders it as Markdown or JSON.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::models::FieldIssue;
use crate::view::ViewModel;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about one dashboard render.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Snapshot the data was read from.
    pub source: String,
    /// Date and time of the render.
    pub generated_at: DateTime<Utc>,
    /// Number of project records.
    pub projects: usize,
    /// Number of story records.
    pub stories: usize,
}

/// A rendered dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub view: ViewModel,
    /// Cells shown as placeholders.
    pub data_issues: Vec<FieldIssue>,
    /// Ids of stories whose project is not in the projects sheet.
    pub orphaned_stories: Vec<String>,
}
