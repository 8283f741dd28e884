//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.roadmap.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".roadmap.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Snapshot source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Column headers of both sheets.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Status labels counted in the summary.
    #[serde(default)]
    pub status: StatusConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. Defaults to `roadmap_report.<ext>` for the format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

/// Where the workbook snapshot lives and how its sheets are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Snapshot path used when `--data` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,

    /// Sheet holding project records.
    #[serde(default = "default_projects_sheet")]
    pub projects_sheet: String,

    /// Sheet holding story records.
    #[serde(default = "default_stories_sheet")]
    pub stories_sheet: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data: None,
            projects_sheet: default_projects_sheet(),
            stories_sheet: default_stories_sheet(),
        }
    }
}

fn default_projects_sheet() -> String {
    "Projects".to_string()
}

fn default_stories_sheet() -> String {
    "Stories".to_string()
}

/// Column headers for both sheets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub projects: ProjectColumns,

    #[serde(default)]
    pub stories: StoryColumns,
}

/// Column headers of the projects sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectColumns {
    #[serde(default = "default_project_column")]
    pub name: String,
    #[serde(default = "default_status_column")]
    pub status: String,
    #[serde(default = "default_progress_column")]
    pub progress: String,
}

impl Default for ProjectColumns {
    fn default() -> Self {
        Self {
            name: default_project_column(),
            status: default_status_column(),
            progress: default_progress_column(),
        }
    }
}

/// Column headers of the stories sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryColumns {
    #[serde(default = "default_id_column")]
    pub id: String,
    #[serde(default = "default_project_column")]
    pub project: String,
    #[serde(default = "default_description_column")]
    pub description: String,
    #[serde(default = "default_status_column")]
    pub status: String,
    #[serde(default = "default_progress_column")]
    pub progress: String,
    #[serde(default = "default_start_date_column")]
    pub start_date: String,
    #[serde(default = "default_due_date_column")]
    pub due_date: String,
    #[serde(default = "default_link_column")]
    pub link: String,
}

impl Default for StoryColumns {
    fn default() -> Self {
        Self {
            id: default_id_column(),
            project: default_project_column(),
            description: default_description_column(),
            status: default_status_column(),
            progress: default_progress_column(),
            start_date: default_start_date_column(),
            due_date: default_due_date_column(),
            link: default_link_column(),
        }
    }
}

fn default_project_column() -> String {
    "Project".to_string()
}

fn default_status_column() -> String {
    "Status".to_string()
}

fn default_progress_column() -> String {
    "Progress".to_string()
}

fn default_id_column() -> String {
    "ID".to_string()
}

fn default_description_column() -> String {
    "Description".to_string()
}

fn default_start_date_column() -> String {
    "Start Date".to_string()
}

fn default_due_date_column() -> String {
    "Due Date".to_string()
}

fn default_link_column() -> String {
    "Link".to_string()
}

/// Status labels the summary counts. Matching is exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_completed")]
    pub completed: String,

    #[serde(default = "default_in_progress")]
    pub in_progress: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            completed: default_completed(),
            in_progress: default_in_progress(),
        }
    }
}

fn default_completed() -> String {
    "Completed".to_string()
}

fn default_in_progress() -> String {
    "In Progress".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Width of text progress bars, in cells.
    #[serde(default = "default_bar_width")]
    pub progress_bar_width: usize,

    /// Include the per-story table in the drill-down section.
    #[serde(default = "default_true")]
    pub include_story_table: bool,

    /// Include the data-quality section.
    #[serde(default = "default_true")]
    pub include_data_issues: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            progress_bar_width: default_bar_width(),
            include_story_table: true,
            include_data_issues: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bar_width() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path wins; otherwise `.roadmap.toml` in `dir` is used
    /// when present. A file that exists but does not parse is an error.
    /// Returns the path the configuration came from, if any.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match Self::load_from_dir(dir)? {
            Some(config) => Ok((config, Some(dir.join(CONFIG_FILE_NAME)))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.source.data = Some(data.clone());
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Where the report is written.
    pub fn output_path(&self) -> PathBuf {
        self.general.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("roadmap_report.{}", self.general.format.extension()))
        })
    }

    /// Log level for the run; `quiet` takes priority over `verbose`.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
