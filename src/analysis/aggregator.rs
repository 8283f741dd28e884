//! Project and story aggregation.
//!
//! This module provides the counts, groupings and filters the dashboard
//! is built from. Every function is pure and leaves its inputs untouched.

use crate::models::{PercentComplete, Project, Story, Tracked};
use std::collections::{BTreeMap, HashSet};

/// Count all projects.
pub fn count_total(projects: &[Project]) -> usize {
    projects.len()
}

/// Count projects whose status equals `status` exactly.
pub fn count_by_status(projects: &[Project], status: &str) -> usize {
    projects.iter().filter(|p| p.status == status).count()
}

/// Count projects per distinct status.
pub fn status_breakdown(projects: &[Project]) -> BTreeMap<String, usize> {
    let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();

    for project in projects {
        *breakdown.entry(project.status.clone()).or_default() += 1;
    }

    breakdown
}

/// Stories belonging to `project_name`, in source order.
pub fn stories_for_project<'a>(stories: &'a [Story], project_name: &str) -> Vec<&'a Story> {
    stories
        .iter()
        .filter(|s| s.project == project_name)
        .collect()
}

/// Stories whose project matches no known project.
pub fn orphaned_stories<'a>(projects: &[Project], stories: &'a [Story]) -> Vec<&'a Story> {
    let names: HashSet<&str> = projects.iter().map(|p| p.name.as_str()).collect();

    stories
        .iter()
        .filter(|s| !names.contains(s.project.as_str()))
        .collect()
}

/// Progress of `entity` clamped to [0, 100] for display.
///
/// Unknown progress yields 0 with `known` unset.
pub fn percent_complete<T: Tracked + ?Sized>(entity: &T) -> PercentComplete {
    match entity.progress().value() {
        Some(value) => PercentComplete {
            value: value.clamp(0.0, 100.0),
            known: true,
        },
        None => PercentComplete {
            value: 0.0,
            known: false,
        },
    }
}

/// Mean of the known progress values, clamped like [`percent_complete`].
pub fn average_progress<'a, T, I>(entities: I) -> Option<f64>
where
    T: Tracked + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (sum, count) = entities
        .into_iter()
        .map(percent_complete)
        .filter(|p| p.known)
        .fold((0.0, 0usize), |(sum, count), p| (sum + p.value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// First project named `name`.
pub fn find_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.name == name)
}

/// First story with identifier `id`.
pub fn find_story<'a>(stories: &[&'a Story], id: &str) -> Option<&'a Story> {
    stories.iter().copied().find(|s| s.id == id)
}

/// Names that occur more than once.
pub fn duplicate_names(projects: &[Project]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for project in projects {
        let name = project.name.as_str();
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }

    duplicates
}
