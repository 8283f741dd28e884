//! Roadmap - project status dashboard
//!
//! A CLI tool that reads the Projects and Stories sheets of a workbook
//! snapshot and renders a status dashboard, optionally drilled into one
//! project and story.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, unreadable or malformed snapshot, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;
mod view;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use report::{Report, ReportMetadata};
use source::{Dataset, SnapshotSource};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use view::{Selection, ViewModelBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is resolved first
    let config = match load_config(&args) {
        Ok((config, origin)) => {
            init_logging(config.log_level(args.quiet));
            match origin {
                Some(path) => info!("Loaded config from: {}", path.display()),
                None => debug!("No config file found, using defaults"),
            }
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Roadmap v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args, config).await {
        error!("Render failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .roadmap.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to match your sheet names, column headers and status labels.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the snapshot, build the view model and write the report.
async fn run(args: Args, config: Config) -> Result<()> {
    let Some(data_path) = config.source.data.clone() else {
        bail!("No data file given. Pass --data or set source.data in {}", CONFIG_FILE_NAME);
    };

    let source = SnapshotSource::new(&data_path);
    let workbook = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load snapshot {}", source.path().display()))?;

    let dataset = Dataset::from_workbook(&workbook, &config.source, &config.columns)
        .with_context(|| format!("Unusable snapshot {}", data_path.display()))?;

    if args.list_projects {
        for project in &dataset.projects {
            println!("{}", project.name);
        }
        return Ok(());
    }

    for name in analysis::duplicate_names(&dataset.projects) {
        warn!("Project name '{}' appears more than once; using the first", name);
    }

    let orphaned_stories: Vec<String> =
        analysis::orphaned_stories(&dataset.projects, &dataset.stories)
            .into_iter()
            .map(|s| {
                warn!("Story '{}' refers to unknown project '{}'", s.id, s.project);
                s.id.clone()
            })
            .collect();

    let selection = match args.project.clone() {
        Some(name) => match args.story.clone() {
            Some(id) => Selection::project(name).with_story(id),
            None => Selection::project(name),
        },
        None => Selection::none(),
    };

    let view = ViewModelBuilder::new(&dataset.projects, &dataset.stories, &config.status)
        .build(&selection);

    if let Some(focus) = view.project_focus() {
        info!(
            "Drilled into '{}' ({} stories)",
            focus.project.name,
            focus.sibling_stories.len()
        );
    }

    let report = Report {
        metadata: ReportMetadata {
            source: data_path.display().to_string(),
            generated_at: Utc::now(),
            projects: dataset.projects.len(),
            stories: dataset.stories.len(),
        },
        view,
        data_issues: dataset.issues,
        orphaned_stories,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = config.output_path();
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        let summary = &report.view.summary;
        println!("📊 Roadmap Summary:");
        println!(
            "   📁 Total: {} | ✅ Completed: {} | 🚀 In Progress: {}",
            summary.total, summary.completed_count, summary.in_progress_count
        );
        if !report.data_issues.is_empty() {
            println!("   ⚠️  {} cell(s) shown as placeholders", report.data_issues.len());
        }
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(())
}

/// Load configuration from file or defaults and merge the CLI arguments.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, origin) = Config::resolve(args.config.as_deref(), Path::new("."))?;
    config.merge_with_args(args);
    Ok((config, origin))
}
