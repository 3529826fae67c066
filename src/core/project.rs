//! Project discovery from `project.json` files in the workspace tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::{self, Tree};
use crate::utils::paths;

pub const PROJECT_FILE: &str = "project.json";

/// Directories never searched for projects.
const IGNORED_DIRS: &[&str] = &["node_modules", "dist", ".git"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Application,
    #[default]
    Library,
}

/// On-disk shape of project.json (only the fields generators read).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    name: Option<String>,
    source_root: Option<String>,
    #[serde(default)]
    project_type: ProjectType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    /// Workspace-relative root; empty for a project at the workspace root.
    pub root: String,
    pub source_root: String,
    pub project_type: ProjectType,
}

impl ProjectConfig {
    pub fn is_application(&self) -> bool {
        self.project_type == ProjectType::Application
    }
}

/// All projects in the workspace, keyed by name.
pub fn projects<T: Tree + ?Sized>(tree: &T) -> Result<BTreeMap<String, ProjectConfig>> {
    let mut found = BTreeMap::new();
    collect_projects(tree, "", &mut found)?;
    Ok(found)
}

fn collect_projects<T: Tree + ?Sized>(
    tree: &T,
    dir: &str,
    found: &mut BTreeMap<String, ProjectConfig>,
) -> Result<()> {
    let project_file = paths::join_path_fragments(&[dir, PROJECT_FILE]);
    if tree.is_file(&project_file) {
        let config = load_project(tree, dir, &project_file)?;
        if let Some(existing) = found.get(&config.name) {
            return Err(Error::config_invalid_value(
                "name",
                Some(config.name.clone()),
                format!(
                    "Project name is used by both '{}' and '{}'",
                    existing.root, config.root
                ),
            ));
        }
        found.insert(config.name.clone(), config);
    }

    for child in tree.children(dir)? {
        if IGNORED_DIRS.contains(&child.as_str()) {
            continue;
        }
        let path = paths::join_path_fragments(&[dir, child.as_str()]);
        // Linked directories may point back at an ancestor.
        if !tree.is_file(&path) && !tree.is_symlink(&path) {
            collect_projects(tree, &path, found)?;
        }
    }

    Ok(())
}

fn load_project<T: Tree + ?Sized>(tree: &T, root: &str, project_file: &str) -> Result<ProjectConfig> {
    let file: ProjectFile = tree::read_json(tree, project_file)?;

    let name = match file.name {
        Some(name) => name,
        None if root.is_empty() => {
            return Err(Error::config_invalid_value(
                "name",
                None,
                format!("{} at the workspace root must declare a name", PROJECT_FILE),
            ))
        }
        None => paths::basename(root),
    };

    let source_root = file
        .source_root
        .map(|s| paths::normalize_path(&s))
        .unwrap_or_else(|| paths::join_path_fragments(&[root, "src"]));

    Ok(ProjectConfig {
        name,
        root: root.to_string(),
        source_root,
        project_type: file.project_type,
    })
}

/// Look up a single project by name.
pub fn project<T: Tree + ?Sized>(tree: &T, name: &str) -> Result<ProjectConfig> {
    projects(tree)?
        .remove(name)
        .ok_or_else(|| Error::project_not_found(name))
}

/// The project whose root most specifically contains `path`.
pub fn project_for_path<'a>(
    projects: &'a BTreeMap<String, ProjectConfig>,
    path: &str,
) -> Option<&'a ProjectConfig> {
    projects
        .values()
        .filter(|p| paths::is_within(path, &p.root))
        .max_by_key(|p| p.root.len())
}
