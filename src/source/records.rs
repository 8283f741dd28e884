//! Record validation.
//!
//! Converts header-keyed rows into typed records. A missing or malformed
//! cell never rejects the row: text degrades to [`PLACEHOLDER`], progress
//! to unknown, dates to [`DateValue::Missing`], and the cell is recorded
//! as a [`FieldIssue`].

use super::Record;
use crate::config::{ProjectColumns, StoryColumns};
use crate::models::{DateValue, FieldIssue, FieldIssueKind, Progress, Project, Story, PLACEHOLDER};
use serde_json::{Number, Value};
use tracing::debug;

/// Validate the rows of the projects sheet.
pub fn read_projects(
    sheet: &str,
    rows: &[&Record],
    columns: &ProjectColumns,
    issues: &mut Vec<FieldIssue>,
) -> Vec<Project> {
    rows.iter()
        .enumerate()
        .map(|(i, record)| {
            let mut row = RowReader::new(sheet, i + 1, record, issues);
            Project {
                name: row.text(&columns.name),
                status: row.text(&columns.status),
                progress: row.progress(&columns.progress),
            }
        })
        .collect()
}

/// Validate the rows of the stories sheet.
pub fn read_stories(
    sheet: &str,
    rows: &[&Record],
    columns: &StoryColumns,
    issues: &mut Vec<FieldIssue>,
) -> Vec<Story> {
    rows.iter()
        .enumerate()
        .map(|(i, record)| {
            let mut row = RowReader::new(sheet, i + 1, record, issues);
            Story {
                id: row.text(&columns.id),
                project: row.text(&columns.project),
                description: row.text(&columns.description),
                status: row.text(&columns.status),
                progress: row.progress(&columns.progress),
                start_date: row.date(&columns.start_date),
                due_date: row.date(&columns.due_date),
                link: row.optional_text(&columns.link),
            }
        })
        .collect()
}

/// Reads typed cells from one row, recording every degraded cell.
struct RowReader<'a> {
    sheet: &'a str,
    row: usize,
    record: &'a Record,
    issues: &'a mut Vec<FieldIssue>,
}

/// A cell after shape checking.
enum Cell<'a> {
    Empty,
    Text(&'a str),
    Number(&'a Number),
    Bool(bool),
    Nested,
}

impl<'a> RowReader<'a> {
    fn new(sheet: &'a str, row: usize, record: &'a Record, issues: &'a mut Vec<FieldIssue>) -> Self {
        Self {
            sheet,
            row,
            record,
            issues,
        }
    }

    fn cell(&self, field: &str) -> Cell<'a> {
        let record: &'a Record = self.record;
        match record.get(field) {
            None | Some(Value::Null) => Cell::Empty,
            Some(Value::String(s)) if s.trim().is_empty() => Cell::Empty,
            Some(Value::String(s)) => Cell::Text(s),
            Some(Value::Number(n)) => Cell::Number(n),
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(Value::Array(_)) | Some(Value::Object(_)) => Cell::Nested,
        }
    }

    fn flag(&mut self, field: &str, kind: FieldIssueKind) {
        debug!(
            "{} row {}: {} value for '{}'",
            self.sheet, self.row, kind, field
        );
        self.issues.push(FieldIssue {
            sheet: self.sheet.to_string(),
            row: self.row,
            field: field.to_string(),
            kind,
        });
    }

    /// Required text cell; placeholder when absent.
    fn text(&mut self, field: &str) -> String {
        match self.cell(field) {
            Cell::Empty => {
                self.flag(field, FieldIssueKind::Missing);
                PLACEHOLDER.to_string()
            }
            Cell::Nested => {
                self.flag(field, FieldIssueKind::Invalid);
                PLACEHOLDER.to_string()
            }
            Cell::Text(s) => s.to_string(),
            Cell::Number(n) => number_text(n),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Optional text cell; absence is not an issue.
    fn optional_text(&mut self, field: &str) -> Option<String> {
        match self.cell(field) {
            Cell::Empty => None,
            Cell::Nested => {
                self.flag(field, FieldIssueKind::Invalid);
                None
            }
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) => Some(number_text(n)),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    fn progress(&mut self, field: &str) -> Progress {
        let parsed = match self.cell(field) {
            Cell::Empty => {
                self.flag(field, FieldIssueKind::Missing);
                return Progress::unknown();
            }
            Cell::Number(n) => n.as_f64().map(Progress::known),
            Cell::Text(s) => Progress::parse(s),
            Cell::Bool(_) | Cell::Nested => None,
        };

        match parsed {
            Some(progress) if progress.is_known() => progress,
            _ => {
                self.flag(field, FieldIssueKind::Invalid);
                Progress::unknown()
            }
        }
    }

    fn date(&mut self, field: &str) -> DateValue {
        match self.cell(field) {
            Cell::Empty => {
                self.flag(field, FieldIssueKind::Missing);
                DateValue::Missing
            }
            Cell::Text(s) => DateValue::parse(s),
            Cell::Number(n) => DateValue::Raw(number_text(n)),
            Cell::Bool(_) | Cell::Nested => {
                self.flag(field, FieldIssueKind::Invalid);
                DateValue::Missing
            }
        }
    }
}

/// Render a numeric cell, dropping the fraction of integral floats.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}
