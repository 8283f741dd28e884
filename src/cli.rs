//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Roadmap - project status dashboard for spreadsheet snapshots
///
/// Reads the Projects and Stories sheets of a workbook snapshot, counts
/// projects by status and renders a Markdown/JSON dashboard, optionally
/// drilled into one project and story.
///
/// Examples:
///   roadmap --data roadmap.json
///   roadmap --data roadmap.json --project Alpha
///   roadmap --data roadmap.json --project Alpha --story S1 --format json
///   roadmap --data roadmap.json --list-projects
///   roadmap --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Workbook snapshot to read (JSON, one array of records per sheet)
    ///
    /// Falls back to `source.data` in .roadmap.toml when omitted.
    #[arg(short, long, value_name = "FILE", env = "ROADMAP_DATA")]
    pub data: Option<PathBuf>,

    /// Project to drill into
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Story to highlight within the selected project
    #[arg(short, long, value_name = "ID", requires = "project")]
    pub story: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to `general.output` in .roadmap.toml, then roadmap_report.md
    /// (or roadmap_report.json with --format json)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .roadmap.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the project names available for --project and exit
    #[arg(long)]
    pub list_projects: bool,

    /// Generate a default .roadmap.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension of reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref project) = self.project {
            if project.trim().is_empty() {
                return Err("Project name must not be empty".to_string());
            }
        }

        if self.story.is_some() && self.project.is_none() {
            return Err("--story requires --project".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
            if !data.is_file() {
                return Err(format!("Data path is not a file: {}", data.display()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            project: None,
            story: None,
            output: None,
            format: None,
            config: None,
            verbose: false,
            quiet: false,
            list_projects: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_selection_flags() {
        let args = Args::try_parse_from([
            "roadmap", "--project", "Alpha", "--story", "S1", "--format", "json",
        ])
        .unwrap();
        assert_eq!(args.project.as_deref(), Some("Alpha"));
        assert_eq!(args.story.as_deref(), Some("S1"));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_story_requires_project() {
        let result = Args::try_parse_from(["roadmap", "--story", "S1"]);
        assert!(result.is_err());

        let mut args = make_args();
        args.story = Some("S1".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_file() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_blank_project() {
        let mut args = make_args();
        args.project = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.init_config = true;
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_ok());
    }
}
