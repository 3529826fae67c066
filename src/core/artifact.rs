//! Where a generated artifact lives: its directory, file name and owning project.
//!
//! Two naming formats are supported:
//!
//! - `as-provided`: the directory option is taken verbatim (workspace-relative)
//!   and the file is named exactly as the artifact. The owning project is
//!   inferred from the directory.
//! - `derived`: the location is derived from the project's source root
//!   (`<sourceRoot>/app` or `<sourceRoot>/lib`), the directory option, and a
//!   folder named after the artifact unless `flat` is set.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::project::{self, ProjectConfig};
use crate::tree::Tree;
use crate::utils::{names, paths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameAndDirectoryFormat {
    AsProvided,
    Derived,
}

impl NameAndDirectoryFormat {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "as-provided" => Ok(Self::AsProvided),
            "derived" => Ok(Self::Derived),
            _ => Err(Error::validation_invalid_argument(
                "format",
                format!("Unknown format '{}'. Use: as-provided, derived", s),
                None,
                Some(vec!["as-provided".to_string(), "derived".to_string()]),
            )),
        }
    }
}

/// Inputs for locating an artifact.
#[derive(Debug, Clone, Default)]
pub struct ArtifactRequest<'a> {
    /// Human label used in error messages (`component`, `hook`, ...).
    pub artifact_type: &'a str,
    pub name: &'a str,
    pub directory: Option<&'a str>,
    pub format: Option<NameAndDirectoryFormat>,
    pub project: Option<&'a str>,
    pub flat: bool,
    /// Extension without the leading dot.
    pub file_extension: &'a str,
    pub pascal_case_file: bool,
    pub pascal_case_directory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    pub artifact_name: String,
    pub directory: String,
    /// File name without extension.
    pub file_name: String,
    pub file_path: String,
    pub project: String,
}

/// Resolve the canonical location of a new artifact.
pub fn determine_artifact_location<T: Tree + ?Sized>(
    tree: &T,
    request: &ArtifactRequest<'_>,
) -> Result<ArtifactLocation> {
    let format = request.format.unwrap_or(if request.project.is_some() {
        NameAndDirectoryFormat::Derived
    } else {
        NameAndDirectoryFormat::AsProvided
    });

    let all = project::projects(tree)?;

    let (directory, file_name, owner) = match format {
        NameAndDirectoryFormat::AsProvided => {
            let directory = paths::normalize_path(request.directory.unwrap_or_default())
                .trim_start_matches('/')
                .to_string();

            let owner = project::project_for_path(&all, &directory).ok_or_else(|| {
                Error::validation_invalid_argument(
                    "directory",
                    format!(
                        "The {} directory '{}' is not inside any project",
                        request.artifact_type, directory
                    ),
                    None,
                    None,
                )
            })?;

            if let Some(expected) = request.project {
                if expected != owner.name {
                    return Err(Error::validation_invalid_argument(
                        "project",
                        format!(
                            "The directory '{}' belongs to project '{}', not '{}'",
                            directory, owner.name, expected
                        ),
                        Some(expected.to_string()),
                        None,
                    ));
                }
            }

            (directory, request.name.to_string(), owner)
        }
        NameAndDirectoryFormat::Derived => {
            let project_name = request
                .project
                .ok_or_else(|| Error::validation_missing_argument(vec!["project".to_string()]))?;
            let owner = all
                .get(project_name)
                .ok_or_else(|| Error::project_not_found(project_name))?;

            let variants = names::names(request.name);
            let file_name = if request.pascal_case_file {
                variants.class_name.clone()
            } else {
                variants.file_name.clone()
            };
            let folder = if request.flat {
                String::new()
            } else if request.pascal_case_directory {
                variants.class_name.clone()
            } else {
                variants.file_name.clone()
            };

            let directory = paths::join_path_fragments(&[
                derived_base(owner).as_str(),
                request.directory.unwrap_or_default(),
                folder.as_str(),
            ]);

            (directory, file_name, owner)
        }
    };

    let file_path = paths::join_path_fragments(&[
        directory.as_str(),
        format!("{}.{}", file_name, request.file_extension).as_str(),
    ]);

    Ok(ArtifactLocation {
        artifact_name: request.name.to_string(),
        directory,
        file_name,
        file_path,
        project: owner.name.clone(),
    })
}

fn derived_base(project: &ProjectConfig) -> String {
    let segment = if project.is_application() { "app" } else { "lib" };
    paths::join_path_fragments(&[project.source_root.as_str(), segment])
}
