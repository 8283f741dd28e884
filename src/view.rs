//! Dashboard view model.
//!
//! Turns the two record sets plus the current selection into a
//! display-ready structure. The builder is stateless: the selection is
//! passed in on every call and nothing is cached between renders.

use crate::analysis::{
    average_progress, count_by_status, count_total, find_project, find_story, percent_complete,
    status_breakdown, stories_for_project,
};
use crate::config::StatusConfig;
use crate::models::{DateValue, PercentComplete, Project, Story};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What the user is drilled into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub project: Option<String>,
    pub story: Option<String>,
}

impl Selection {
    /// The overview, with nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Select a project.
    pub fn project(name: impl Into<String>) -> Self {
        Self {
            project: Some(name.into()),
            story: None,
        }
    }

    /// Also select a story within the project.
    pub fn with_story(mut self, id: impl Into<String>) -> Self {
        self.story = Some(id.into());
        self
    }
}

/// Headline counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    /// Project count per distinct status.
    pub by_status: BTreeMap<String, usize>,
}

/// A chart series, or an explicit signal that there is nothing to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "snake_case")]
pub enum Series<T> {
    Rows(Vec<T>),
    NoData,
}

impl<T> Series<T> {
    /// Wrap rows, signalling `NoData` when there are none.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Series::NoData
        } else {
            Series::Rows(rows)
        }
    }

    /// The rows, empty for `NoData`.
    pub fn rows(&self) -> &[T] {
        match self {
            Series::Rows(rows) => rows,
            Series::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Series::NoData)
    }
}

/// One bar of the project overview chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPoint {
    pub name: String,
    pub progress: PercentComplete,
    pub status: String,
}

/// One bar of the drill-down chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryPoint {
    pub id: String,
    pub description: String,
    pub progress: PercentComplete,
    pub status: String,
    pub start_date: DateValue,
    pub due_date: DateValue,
}

/// A resolved project selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFocus {
    pub project: Project,
    pub progress: PercentComplete,
    /// The selected story, absent when none was selected or it was not found.
    pub story: Option<Story>,
    /// Every story of the project, in source order.
    pub sibling_stories: Vec<Story>,
    /// Mean of the known story progress values.
    pub story_progress: Option<f64>,
}

/// Home view or a project drill-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Focus {
    Home,
    Project(ProjectFocus),
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub summary: Summary,
    /// Project names offered by the selector, in source order.
    pub project_options: Vec<String>,
    pub focus: Focus,
    pub project_chart: Series<ProjectPoint>,
    /// Absent on the home view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_chart: Option<Series<StoryPoint>>,
}

impl ViewModel {
    /// The resolved project selection, if any.
    pub fn project_focus(&self) -> Option<&ProjectFocus> {
        match &self.focus {
            Focus::Project(focus) => Some(focus),
            Focus::Home => None,
        }
    }
}

/// Builds view models over one snapshot of both record sets.
pub struct ViewModelBuilder<'a> {
    projects: &'a [Project],
    stories: &'a [Story],
    status: &'a StatusConfig,
}

impl<'a> ViewModelBuilder<'a> {
    pub fn new(projects: &'a [Project], stories: &'a [Story], status: &'a StatusConfig) -> Self {
        Self {
            projects,
            stories,
            status,
        }
    }

    /// Build the view model for `selection`.
    ///
    /// Unresolvable selections degrade to the enclosing scope: an unknown
    /// story leaves the project selected, an unknown project shows home.
    pub fn build(&self, selection: &Selection) -> ViewModel {
        let focus = self.resolve(selection);
        let story_chart = match &focus {
            Focus::Project(focus) => Some(story_series(&focus.sibling_stories)),
            Focus::Home => None,
        };

        ViewModel {
            summary: self.summary(),
            project_options: self.projects.iter().map(|p| p.name.clone()).collect(),
            focus,
            project_chart: self.project_series(),
            story_chart,
        }
    }

    /// Headline counts over all projects.
    pub fn summary(&self) -> Summary {
        Summary {
            total: count_total(self.projects),
            completed_count: count_by_status(self.projects, &self.status.completed),
            in_progress_count: count_by_status(self.projects, &self.status.in_progress),
            by_status: status_breakdown(self.projects),
        }
    }

    fn project_series(&self) -> Series<ProjectPoint> {
        Series::from_rows(
            self.projects
                .iter()
                .map(|p| ProjectPoint {
                    name: p.name.clone(),
                    progress: percent_complete(p),
                    status: p.status.clone(),
                })
                .collect(),
        )
    }

    fn resolve(&self, selection: &Selection) -> Focus {
        let Some(ref name) = selection.project else {
            if let Some(ref id) = selection.story {
                warn!("Story '{}' selected without a project; showing overview", id);
            }
            return Focus::Home;
        };

        let Some(project) = find_project(self.projects, name) else {
            warn!("Project '{}' not found; showing overview", name);
            return Focus::Home;
        };

        let siblings = stories_for_project(self.stories, &project.name);
        debug!("Project '{}' has {} stories", project.name, siblings.len());

        let story = selection.story.as_deref().and_then(|id| {
            let found = find_story(&siblings, id);
            if found.is_none() {
                warn!("Story '{}' not found in project '{}'", id, project.name);
            }
            found.cloned()
        });

        Focus::Project(ProjectFocus {
            project: project.clone(),
            progress: percent_complete(project),
            story,
            story_progress: average_progress(siblings.iter().copied()),
            sibling_stories: siblings.into_iter().cloned().collect(),
        })
    }
}

fn story_series(stories: &[Story]) -> Series<StoryPoint> {
    Series::from_rows(
        stories
            .iter()
            .map(|s| StoryPoint {
                id: s.id.clone(),
                description: s.description.clone(),
                progress: percent_complete(s),
                status: s.status.clone(),
                start_date: s.start_date.clone(),
                due_date: s.due_date.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Progress;

    fn project(name: &str, status: &str, progress: f64) -> Project {
        Project {
            name: name.to_string(),
            status: status.to_string(),
            progress: Progress::known(progress),
        }
    }

    fn story(id: &str, project: &str, progress: Progress) -> Story {
        Story {
            id: id.to_string(),
            project: project.to_string(),
            description: "desc".to_string(),
            status: "Completed".to_string(),
            progress,
            start_date: DateValue::parse("2024-01-01"),
            due_date: DateValue::parse("2024-02-01"),
            link: None,
        }
    }

    fn fixture() -> (Vec<Project>, Vec<Story>) {
        let projects = vec![
            project("Alpha", "Completed", 100.0),
            project("Beta", "In Progress", 40.0),
        ];
        let stories = vec![
            story("S1", "Alpha", Progress::known(100.0)),
            story("S2", "Alpha", Progress::unknown()),
        ];
        (projects, stories)
    }

    #[test]
    fn test_summary_scenario() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&projects, &stories, &status).build(&Selection::none());

        assert_eq!(view.summary.total, 2);
        assert_eq!(view.summary.completed_count, 1);
        assert_eq!(view.summary.in_progress_count, 1);
        assert_eq!(view.focus, Focus::Home);
        assert!(view.story_chart.is_none());
        assert_eq!(view.project_options, vec!["Alpha", "Beta"]);
        assert_eq!(view.project_chart.rows().len(), 2);
    }

    #[test]
    fn test_configured_status_labels() {
        let projects = vec![
            project("A", "Concluído", 100.0),
            project("B", "Em Andamento", 10.0),
            project("C", "Em Andamento", 20.0),
        ];
        let status = StatusConfig {
            completed: "Concluído".to_string(),
            in_progress: "Em Andamento".to_string(),
        };
        let summary = ViewModelBuilder::new(&projects, &[], &status).summary();

        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.in_progress_count, 2);
    }

    #[test]
    fn test_unknown_project_matches_home() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let builder = ViewModelBuilder::new(&projects, &stories, &status);

        let home = builder.build(&Selection::none());
        let missing = builder.build(&Selection::project("Omega"));
        let missing_with_story = builder.build(&Selection::project("Omega").with_story("S1"));

        assert_eq!(missing, home);
        assert_eq!(missing_with_story, home);
    }

    #[test]
    fn test_story_without_project_is_home() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let builder = ViewModelBuilder::new(&projects, &stories, &status);

        let selection = Selection {
            project: None,
            story: Some("S1".to_string()),
        };
        assert_eq!(builder.build(&selection), builder.build(&Selection::none()));
    }

    #[test]
    fn test_project_and_story_resolved() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&projects, &stories, &status)
            .build(&Selection::project("Alpha").with_story("S2"));

        let focus = view.project_focus().unwrap();
        assert_eq!(focus.project.name, "Alpha");
        assert_eq!(focus.story.as_ref().map(|s| s.id.as_str()), Some("S2"));
        assert_eq!(focus.sibling_stories.len(), 2);
        assert_eq!(focus.story_progress, Some(100.0));

        let chart = view.story_chart.as_ref().unwrap();
        assert_eq!(chart.rows().len(), 2);
        assert!(!chart.rows()[1].progress.known);
        assert_eq!(chart.rows()[1].progress.value, 0.0);
    }

    #[test]
    fn test_unknown_story_keeps_project() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&projects, &stories, &status)
            .build(&Selection::project("Alpha").with_story("S99"));

        let focus = view.project_focus().unwrap();
        assert_eq!(focus.project.name, "Alpha");
        assert!(focus.story.is_none());
        assert_eq!(focus.sibling_stories.len(), 2);
    }

    #[test]
    fn test_project_without_stories_signals_no_data() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let view =
            ViewModelBuilder::new(&projects, &stories, &status).build(&Selection::project("Beta"));

        let focus = view.project_focus().unwrap();
        assert!(focus.sibling_stories.is_empty());
        assert_eq!(focus.story_progress, None);
        assert_eq!(view.story_chart, Some(Series::NoData));
    }

    #[test]
    fn test_empty_snapshot() {
        let status = StatusConfig::default();
        let view = ViewModelBuilder::new(&[], &[], &status).build(&Selection::none());

        assert_eq!(view.summary.total, 0);
        assert!(view.project_chart.is_no_data());
        assert!(view.project_options.is_empty());
    }

    #[test]
    fn test_view_model_json_shape() {
        let (projects, stories) = fixture();
        let status = StatusConfig::default();
        let builder = ViewModelBuilder::new(&projects, &stories, &status);

        let home = serde_json::to_value(builder.build(&Selection::none())).unwrap();
        assert_eq!(home["focus"]["view"], "home");
        assert_eq!(home["project_chart"]["state"], "rows");
        assert!(home.get("story_chart").is_none());

        let beta = serde_json::to_value(builder.build(&Selection::project("Beta"))).unwrap();
        assert_eq!(beta["focus"]["view"], "project");
        assert_eq!(beta["focus"]["project"]["name"], "Beta");
        assert_eq!(beta["story_chart"]["state"], "no_data");
    }
}
