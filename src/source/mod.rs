//! Tabular data source.
//!
//! A workbook snapshot holds one array of header-keyed records per sheet.
//! Records are validated into typed [`Project`]s and [`Story`]s here, so
//! nothing past this module reads cells by string key.

pub mod records;
pub mod snapshot;

pub use records::{read_projects, read_stories};
pub use snapshot::SnapshotSource;

use crate::config::{ColumnsConfig, SourceConfig};
use crate::models::{FieldIssue, Project, Story};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

/// One row of a sheet, keyed by column header.
pub type Record = Map<String, Value>;

/// Failure to obtain usable sheets from the data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read snapshot: {0}")]
    Read(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot root must be an object keyed by sheet name")]
    NotAWorkbook,

    #[error("sheet '{0}' not found in snapshot")]
    MissingSheet(String),

    #[error("sheet '{0}' is not an array of records")]
    NotASheet(String),

    #[error("sheet '{sheet}' row {row} is not a record")]
    NotARecord { sheet: String, row: usize },
}

/// A parsed workbook snapshot.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Map<String, Value>,
}

impl Workbook {
    /// Parses a snapshot document.
    pub fn from_json(content: &str) -> Result<Self, SourceError> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(sheets) => Ok(Self { sheets }),
            _ => Err(SourceError::NotAWorkbook),
        }
    }

    /// Names of the sheets in the snapshot.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Returns the records of a sheet, in row order.
    pub fn sheet(&self, name: &str) -> Result<Vec<&Record>, SourceError> {
        let rows = self
            .sheets
            .get(name)
            .ok_or_else(|| SourceError::MissingSheet(name.to_string()))?
            .as_array()
            .ok_or_else(|| SourceError::NotASheet(name.to_string()))?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_object().ok_or_else(|| SourceError::NotARecord {
                    sheet: name.to_string(),
                    row: i + 1,
                })
            })
            .collect()
    }
}

/// Typed snapshot of both record sets for one render.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub stories: Vec<Story>,
    /// Cells degraded to placeholders during validation.
    pub issues: Vec<FieldIssue>,
}

impl Dataset {
    /// Validates both sheets of a workbook into typed records.
    pub fn from_workbook(
        workbook: &Workbook,
        source: &SourceConfig,
        columns: &ColumnsConfig,
    ) -> Result<Self, SourceError> {
        let mut issues = Vec::new();

        let project_rows = workbook.sheet(&source.projects_sheet)?;
        let projects = read_projects(
            &source.projects_sheet,
            &project_rows,
            &columns.projects,
            &mut issues,
        );

        let story_rows = workbook.sheet(&source.stories_sheet)?;
        let stories = read_stories(
            &source.stories_sheet,
            &story_rows,
            &columns.stories,
            &mut issues,
        );

        info!(
            "Loaded {} projects and {} stories",
            projects.len(),
            stories.len()
        );
        if !issues.is_empty() {
            warn!(
                "{} cell(s) missing or invalid; shown as placeholders",
                issues.len()
            );
        }

        Ok(Self {
            projects,
            stories,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldIssueKind;

    const SNAPSHOT: &str = r#"{
        "Projects": [
            {"Project": "Alpha", "Status": "Completed", "Progress": 100},
            {"Project": "Beta", "Status": "In Progress", "Progress": "40%"}
        ],
        "Stories": [
            {"ID": 1, "Project": "Alpha", "Description": "Login", "Status": "Completed",
             "Progress": 100, "Start Date": "2024-01-02", "Due Date": "2024-02-01"}
        ]
    }"#;

    #[test]
    fn test_workbook_sheets() {
        let workbook = Workbook::from_json(SNAPSHOT).unwrap();
        let names: Vec<_> = workbook.sheet_names().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(workbook.sheet("Projects").unwrap().len(), 2);
    }

    #[test]
    fn test_workbook_rejects_non_object_root() {
        let err = Workbook::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, SourceError::NotAWorkbook));
    }

    #[test]
    fn test_workbook_rejects_bad_json() {
        let err = Workbook::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_missing_sheet() {
        let workbook = Workbook::from_json(r#"{"Projects": []}"#).unwrap();
        let err = workbook.sheet("Stories").unwrap_err();
        assert!(matches!(err, SourceError::MissingSheet(ref name) if name == "Stories"));
    }

    #[test]
    fn test_sheet_shape_errors() {
        let workbook =
            Workbook::from_json(r#"{"Projects": {"a": 1}, "Stories": [{"ID": 1}, 7]}"#).unwrap();
        assert!(matches!(
            workbook.sheet("Projects").unwrap_err(),
            SourceError::NotASheet(_)
        ));
        assert!(matches!(
            workbook.sheet("Stories").unwrap_err(),
            SourceError::NotARecord { row: 2, .. }
        ));
    }

    #[test]
    fn test_dataset_from_workbook() {
        let workbook = Workbook::from_json(SNAPSHOT).unwrap();
        let dataset = Dataset::from_workbook(
            &workbook,
            &SourceConfig::default(),
            &ColumnsConfig::default(),
        )
        .unwrap();

        assert_eq!(dataset.projects.len(), 2);
        assert_eq!(dataset.projects[1].progress.value(), Some(40.0));
        assert_eq!(dataset.stories.len(), 1);
        assert_eq!(dataset.stories[0].id, "1");
        assert!(dataset.stories[0].link.is_none());
        assert!(dataset.issues.is_empty());
    }

    #[test]
    fn test_dataset_records_missing_fields() {
        let workbook = Workbook::from_json(
            r#"{"Projects": [{"Project": "Gamma"}], "Stories": []}"#,
        )
        .unwrap();
        let dataset = Dataset::from_workbook(
            &workbook,
            &SourceConfig::default(),
            &ColumnsConfig::default(),
        )
        .unwrap();

        assert_eq!(dataset.projects.len(), 1);
        assert_eq!(dataset.issues.len(), 2);
        assert!(dataset
            .issues
            .iter()
            .all(|issue| issue.kind == FieldIssueKind::Missing && issue.row == 1));
    }
}
