//! Markdown and JSON report generation.

use super::{Report, ReportMetadata};
use crate::config::ReportConfig;
use crate::models::{FieldIssue, PercentComplete, Story, PLACEHOLDER};
use crate::view::{Focus, ProjectFocus, ProjectPoint, Series, StoryPoint, Summary};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Project Roadmap\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.view.summary));
    output.push_str(&generate_status_section(&report.view.summary));

    match &report.view.focus {
        Focus::Home => {
            output.push_str(&generate_projects_section(
                &report.view.project_chart,
                config.progress_bar_width,
            ));
        }
        Focus::Project(focus) => {
            let stories = report.view.story_chart.as_ref();
            output.push_str(&generate_focus_section(focus, stories, config));
        }
    }

    if config.include_data_issues {
        output.push_str(&generate_data_quality_section(
            &report.data_issues,
            &report.orphaned_stories,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Render a text progress bar such as `████░░░░ 50%`.
pub fn progress_bar(progress: &PercentComplete, width: usize) -> String {
    if !progress.known {
        return format!("{} {}", "·".repeat(width), progress.label());
    }

    let filled = ((progress.value / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{} {}",
        "█".repeat(filled),
        "░".repeat(width - filled),
        progress.label()
    )
}

/// Escape text for a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records:** {} projects, {} stories\n\n",
        metadata.projects, metadata.stories
    ));

    section
}

/// Generate the summary cards.
fn generate_summary_section(summary: &Summary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| 📁 Total Projects | ✅ Completed | 🚀 In Progress |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | **{}** | **{}** |\n\n",
        summary.total, summary.completed_count, summary.in_progress_count
    ));

    section
}

/// Generate the status breakdown.
fn generate_status_section(summary: &Summary) -> String {
    if summary.by_status.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Projects by Status\n\n");
    section.push_str("| Status | Projects | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    let mut statuses: Vec<_> = summary.by_status.iter().collect();
    statuses.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

    for (status, count) in statuses {
        let share = *count as f64 / summary.total.max(1) as f64 * 100.0;
        section.push_str(&format!("| {} | {} | {:.0}% |\n", cell(status), count, share));
    }
    section.push('\n');

    section
}

/// Generate the project overview chart.
fn generate_projects_section(chart: &Series<ProjectPoint>, width: usize) -> String {
    let mut section = String::new();

    section.push_str("## Projects\n\n");

    if chart.is_no_data() {
        section.push_str("No projects found.\n\n");
        return section;
    }

    section.push_str("| Project | Status | Progress |\n");
    section.push_str("|:---|:---|:---|\n");
    for point in chart.rows() {
        section.push_str(&format!(
            "| {} | {} | `{}` |\n",
            cell(&point.name),
            cell(&point.status),
            progress_bar(&point.progress, width)
        ));
    }
    section.push('\n');

    section
}

/// Generate the drill-down section for a selected project.
fn generate_focus_section(
    focus: &ProjectFocus,
    stories: Option<&Series<StoryPoint>>,
    config: &ReportConfig,
) -> String {
    let mut section = String::new();
    let width = config.progress_bar_width;

    section.push_str(&format!("## Project: {}\n\n", focus.project.name));
    section.push_str(&format!("- **Status:** {}\n", focus.project.status));
    section.push_str(&format!(
        "- **Progress:** `{}`\n",
        progress_bar(&focus.progress, width)
    ));
    section.push_str(&format!("- **Stories:** {}\n", focus.sibling_stories.len()));
    if let Some(average) = focus.story_progress {
        section.push_str(&format!("- **Average story progress:** {:.0}%\n", average));
    }
    section.push('\n');

    if let Some(ref story) = focus.story {
        section.push_str(&generate_story_block(story, width));
    }

    if !config.include_story_table {
        return section;
    }

    section.push_str("### Stories\n\n");
    match stories {
        Some(Series::Rows(rows)) => {
            section.push_str("| ID | Description | Status | Start | Due | Progress |\n");
            section.push_str("|:---|:---|:---|:---:|:---:|:---|\n");
            for point in rows {
                section.push_str(&format!(
                    "| {} | {} | {} | {} | {} | `{}` |\n",
                    cell(&point.id),
                    cell(&point.description),
                    cell(&point.status),
                    cell(&point.start_date.to_string()),
                    cell(&point.due_date.to_string()),
                    progress_bar(&point.progress, width)
                ));
            }
            section.push('\n');
        }
        Some(Series::NoData) | None => {
            section.push_str("No stories recorded for this project.\n\n");
        }
    }

    section
}

/// Generate the detail block of the selected story.
fn generate_story_block(story: &Story, width: usize) -> String {
    let mut block = String::new();

    block.push_str(&format!("### Story {}\n\n", story.id));
    block.push_str(&format!("{}\n\n", story.description));
    block.push_str(&format!("- **Status:** {}\n", story.status));
    block.push_str(&format!(
        "- **Progress:** `{}`\n",
        progress_bar(&crate::analysis::percent_complete(story), width)
    ));
    block.push_str(&format!("- **Start:** {}\n", story.start_date));
    block.push_str(&format!("- **Due:** {}\n", story.due_date));
    match story.link {
        Some(ref link) => block.push_str(&format!("- **Link:** <{}>\n", link)),
        None => block.push_str(&format!("- **Link:** {}\n", PLACEHOLDER)),
    }
    block.push('\n');

    block
}

/// Generate the data-quality notes.
fn generate_data_quality_section(issues: &[FieldIssue], orphans: &[String]) -> String {
    if issues.is_empty() && orphans.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Data Quality\n\n");

    if !issues.is_empty() {
        section.push_str(&format!(
            "{} cell(s) were missing or invalid and are shown as `{}` or `unknown`:\n\n",
            issues.len(),
            PLACEHOLDER
        ));
        for issue in issues {
            section.push_str(&format!("- {}\n", issue));
        }
        section.push('\n');
    }

    if !orphans.is_empty() {
        section.push_str(&format!(
            "Stories without a matching project: {}\n\n",
            orphans.join(", ")
        ));
    }

    section
}

fn generate_footer() -> String {
    "---\n\n*Generated by roadmap*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusConfig;
    use crate::models::{DateValue, FieldIssueKind, Progress, Project};
    use crate::view::{Selection, ViewModelBuilder};
    use chrono::Utc;

    fn sample_data() -> (Vec<Project>, Vec<Story>) {
        let projects = vec![
            Project {
                name: "Alpha".to_string(),
                status: "Completed".to_string(),
                progress: Progress::known(100.0),
            },
            Project {
                name: "Beta".to_string(),
                status: "In Progress".to_string(),
                progress: Progress::known(40.0),
            },
        ];
        let stories = vec![Story {
            id: "S1".to_string(),
            project: "Alpha".to_string(),
            description: "Single sign-on | SAML".to_string(),
            status: "Completed".to_string(),
            progress: Progress::known(100.0),
            start_date: DateValue::parse("2024-01-08"),
            due_date: DateValue::Missing,
            link: Some("https://tracker.example.com/S1".to_string()),
        }];
        (projects, stories)
    }

    fn create_test_report(selection: &Selection) -> Report {
        let (projects, stories) = sample_data();
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&projects, &stories, &status).build(selection);

        Report {
            metadata: ReportMetadata {
                source: "fixtures/roadmap.json".to_string(),
                generated_at: Utc::now(),
                projects: projects.len(),
                stories: stories.len(),
            },
            view,
            data_issues: vec![FieldIssue {
                sheet: "Stories".to_string(),
                row: 1,
                field: "Due Date".to_string(),
                kind: FieldIssueKind::Missing,
            }],
            orphaned_stories: vec!["S9".to_string()],
        }
    }

    #[test]
    fn test_progress_bar() {
        let half = PercentComplete {
            value: 50.0,
            known: true,
        };
        assert_eq!(progress_bar(&half, 4), "██░░ 50%");

        let unknown = PercentComplete {
            value: 0.0,
            known: false,
        };
        assert_eq!(progress_bar(&unknown, 3), "··· unknown");
    }

    #[test]
    fn test_home_report() {
        let report = create_test_report(&Selection::none());
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Project Roadmap"));
        assert!(markdown.contains("| **2** | **1** | **1** |"));
        assert!(markdown.contains("### Projects by Status"));
        assert!(markdown.contains("## Projects"));
        assert!(markdown.contains("| Beta | In Progress |"));
        assert!(!markdown.contains("## Project: "));
    }

    #[test]
    fn test_drill_down_report() {
        let report = create_test_report(&Selection::project("Alpha").with_story("S1"));
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("## Project: Alpha"));
        assert!(markdown.contains("### Story S1"));
        assert!(markdown.contains("<https://tracker.example.com/S1>"));
        assert!(markdown.contains("Single sign-on \\| SAML"));
        assert!(markdown.contains("| 2024-01-08 | — |"));
    }

    #[test]
    fn test_story_table_escapes_raw_dates() {
        let (projects, mut stories) = sample_data();
        stories[0].start_date = DateValue::parse("Q1|Q2");
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&projects, &stories, &status)
            .build(&Selection::project("Alpha"));
        let report = Report {
            view,
            ..create_test_report(&Selection::none())
        };
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("| Q1\\|Q2 | — |"));
    }

    #[test]
    fn test_no_stories_signal() {
        let report = create_test_report(&Selection::project("Beta"));
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("## Project: Beta"));
        assert!(markdown.contains("No stories recorded for this project."));
    }

    #[test]
    fn test_data_quality_section_toggle() {
        let report = create_test_report(&Selection::none());

        let markdown = generate_markdown_report(&report, &ReportConfig::default());
        assert!(markdown.contains("## Data Quality"));
        assert!(markdown.contains("Stories row 1: missing value for 'Due Date'"));
        assert!(markdown.contains("Stories without a matching project: S9"));

        let config = ReportConfig {
            include_data_issues: false,
            ..ReportConfig::default()
        };
        let markdown = generate_markdown_report(&report, &config);
        assert!(!markdown.contains("## Data Quality"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(&Selection::project("Alpha"));
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"completed_count\": 1"));
        assert!(json.contains("\"view\": \"project\""));
        assert!(json.contains("\"data_issues\""));
    }
}
