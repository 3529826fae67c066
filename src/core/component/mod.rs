//! Component generator options: validation, normalization, and the barrel
//! export that makes a new component importable from its library.

mod barrel;

pub use barrel::{
    add_export_changes, add_exports_to_barrel, barrel_path, export_statement,
    exports_default_as, find_module_declarations, relative_import_path, BarrelOutcome,
    DeclarationKind, ModuleDeclaration,
};

use serde::{Deserialize, Serialize};

use crate::artifact::{self, ArtifactRequest, NameAndDirectoryFormat};
use crate::error::{Error, InvalidNameDetails, Result};
use crate::project;
use crate::tree::Tree;
use crate::utils::{names, validation};

/// Extension of generated component files.
pub const COMPONENT_FILE_EXTENSION: &str = "vue";

const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

pub const EXPORT_ON_APPLICATION_WARNING: &str =
    "The \"--export\" option should not be used with applications and will do nothing.";

/// Options as supplied by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOptions {
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub name_and_directory_format: Option<NameAndDirectoryFormat>,
    #[serde(default)]
    pub flat: bool,
    #[serde(default)]
    pub pascal_case_files: bool,
    #[serde(default)]
    pub pascal_case_directory: bool,
    /// Generate JavaScript instead of TypeScript (selects `index.js`).
    #[serde(default)]
    pub js: bool,
    /// Re-export the component from the project's barrel file.
    #[serde(default)]
    pub export: bool,
    #[serde(default)]
    pub routing: Option<bool>,
    #[serde(default)]
    pub in_source_tests: Option<bool>,
    #[serde(default)]
    pub skip_tests: bool,
    /// Append the barrel export even when an identical one already exists.
    #[serde(default)]
    pub allow_duplicate_exports: bool,
}

/// Fully resolved options, ready for file emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedComponentOptions {
    pub name: String,
    pub class_name: String,
    pub file_name: String,
    pub file_path: String,
    pub directory: String,
    pub project: String,
    pub project_source_root: String,
    pub export: bool,
    pub routing: bool,
    pub in_source_tests: bool,
    pub js: bool,
    pub flat: bool,
    pub pascal_case_files: bool,
    pub pascal_case_directory: bool,
    pub skip_tests: bool,
    pub allow_duplicate_exports: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Reject names that embed a path separator.
///
/// The error proposes the equivalent invocation: the last segment stays the
/// name, the leading segments (lower-cased) move into `--directory`, after
/// any directory already given.
pub fn assert_valid_options(options: &ComponentOptions) -> Result<()> {
    for separator in PATH_SEPARATORS {
        if !options.name.contains(separator) {
            continue;
        }

        let sep = separator.to_string();
        let mut segments: Vec<&str> = options.name.split(separator).collect();
        let name = segments.pop().unwrap_or_default().to_string();

        let mut suggestion = segments
            .iter()
            .map(|s| s.to_lowercase())
            .collect::<Vec<_>>()
            .join(&sep);
        if let Some(directory) = options.directory.as_deref().filter(|d| !d.is_empty()) {
            suggestion = format!("{}{}{}", directory, sep, suggestion);
        }

        let message = format!(
            "Found \"{}\" in the component name. Did you mean to use the --directory option (e.g. `scaffold component {} --directory {}`)?",
            sep, name, suggestion
        );

        return Err(Error::validation_invalid_name(
            message,
            InvalidNameDetails {
                name: options.name.clone(),
                separator: sep,
                suggested_name: name,
                suggested_directory: suggestion,
            },
        ));
    }

    Ok(())
}

/// Validate and resolve raw options into their normalized form.
///
/// Exporting from an application is allowed but pointless; it produces a
/// warning rather than an error.
pub fn normalize_options<T: Tree + ?Sized>(
    tree: &T,
    options: &ComponentOptions,
) -> Result<NormalizedComponentOptions> {
    assert_valid_options(options)?;
    validation::require_non_empty(&options.name, "name", "Component name cannot be empty")?;

    let location = artifact::determine_artifact_location(
        tree,
        &ArtifactRequest {
            artifact_type: "component",
            name: &options.name,
            directory: options.directory.as_deref(),
            format: options.name_and_directory_format,
            project: options.project.as_deref(),
            flat: options.flat,
            file_extension: COMPONENT_FILE_EXTENSION,
            pascal_case_file: options.pascal_case_files,
            pascal_case_directory: options.pascal_case_directory,
        },
    )?;

    let class_name = names::names(&location.file_name).class_name;
    let owner = project::project(tree, &location.project)?;

    let mut warnings = Vec::new();
    if options.export && owner.is_application() {
        log_status!("component", "{}", EXPORT_ON_APPLICATION_WARNING);
        warnings.push(EXPORT_ON_APPLICATION_WARNING.to_string());
    }

    Ok(NormalizedComponentOptions {
        name: location.artifact_name,
        class_name,
        file_name: location.file_name,
        file_path: location.file_path,
        directory: location.directory,
        project: location.project,
        project_source_root: owner.source_root,
        export: options.export,
        routing: options.routing.unwrap_or(false),
        in_source_tests: options.in_source_tests.unwrap_or(false),
        js: options.js,
        flat: options.flat,
        pascal_case_files: options.pascal_case_files,
        pascal_case_directory: options.pascal_case_directory,
        skip_tests: options.skip_tests,
        allow_duplicate_exports: options.allow_duplicate_exports,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn workspace() -> MemoryTree {
        MemoryTree::new()
            .with_file(
                "apps/shop/project.json",
                r#"{"name": "shop", "sourceRoot": "apps/shop/src", "projectType": "application"}"#,
            )
            .with_file(
                "libs/ui/project.json",
                r#"{"name": "ui", "sourceRoot": "libs/ui/src", "projectType": "library"}"#,
            )
    }

    fn options(name: &str, project: &str) -> ComponentOptions {
        ComponentOptions {
            name: name.to_string(),
            project: Some(project.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn plain_name_is_valid() {
        assert!(assert_valid_options(&options("bar", "ui")).is_ok());
    }

    #[test]
    fn forward_slash_suggests_directory() {
        let err = assert_valid_options(&options("Foo/bar", "ui")).unwrap_err();

        assert_eq!(err.code.as_str(), "validation.invalid_name");
        assert!(err.message.contains("Found \"/\" in the component name"));
        assert!(err.message.contains("scaffold component bar --directory foo"));
        assert_eq!(err.details["suggestedName"], "bar");
        assert_eq!(err.details["suggestedDirectory"], "foo");
    }

    #[test]
    fn backslash_is_rejected_and_keeps_segment_order() {
        let err = assert_valid_options(&options("Forms\\Inputs\\text-field", "ui")).unwrap_err();
        assert_eq!(err.details["separator"], "\\");
        assert_eq!(err.details["suggestedDirectory"], "forms\\inputs");
        assert_eq!(err.details["suggestedName"], "text-field");
    }

    #[test]
    fn suggestion_is_prefixed_with_existing_directory() {
        let opts = ComponentOptions {
            directory: Some("shared".to_string()),
            ..options("widgets/card", "ui")
        };
        let err = assert_valid_options(&opts).unwrap_err();
        assert_eq!(err.details["suggestedDirectory"], "shared/widgets");
    }

    #[test]
    fn normalize_derives_class_name_and_defaults_flags() {
        let normalized = normalize_options(&workspace(), &options("my-button", "ui")).unwrap();

        assert_eq!(normalized.name, "my-button");
        assert_eq!(normalized.class_name, "MyButton");
        assert_eq!(normalized.file_name, "my-button");
        assert_eq!(normalized.file_path, "libs/ui/src/lib/my-button/my-button.vue");
        assert_eq!(normalized.directory, "libs/ui/src/lib/my-button");
        assert_eq!(normalized.project_source_root, "libs/ui/src");
        assert!(!normalized.routing);
        assert!(!normalized.in_source_tests);
        assert!(!normalized.export);
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn normalize_keeps_explicit_flags() {
        let opts = ComponentOptions {
            routing: Some(true),
            in_source_tests: Some(true),
            js: true,
            ..options("nav-bar", "ui")
        };
        let normalized = normalize_options(&workspace(), &opts).unwrap();
        assert!(normalized.routing);
        assert!(normalized.in_source_tests);
        assert!(normalized.js);
    }

    #[test]
    fn normalize_warns_when_exporting_from_application() {
        let opts = ComponentOptions {
            export: true,
            ..options("cart", "shop")
        };
        let normalized = normalize_options(&workspace(), &opts).unwrap();
        assert_eq!(normalized.warnings, vec![EXPORT_ON_APPLICATION_WARNING.to_string()]);
        assert!(normalized.export);
    }

    #[test]
    fn normalize_rejects_invalid_name_before_lookup() {
        // No projects exist: a path lookup would fail with a different error.
        let err = normalize_options(&MemoryTree::new(), &options("a/b", "missing")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_name");
    }

    #[test]
    fn normalize_rejects_empty_name() {
        let err = normalize_options(&workspace(), &options("  ", "ui")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn normalize_propagates_missing_project() {
        let err = normalize_options(&workspace(), &options("card", "admin")).unwrap_err();
        assert_eq!(err.code.as_str(), "project.not_found");
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let opts: ComponentOptions = serde_json::from_str(
            r#"{"name": "card", "project": "ui", "pascalCaseFiles": true, "nameAndDirectoryFormat": "as-provided", "inSourceTests": true}"#,
        )
        .unwrap();
        assert!(opts.pascal_case_files);
        assert_eq!(opts.name_and_directory_format, Some(NameAndDirectoryFormat::AsProvided));
        assert_eq!(opts.in_source_tests, Some(true));
        assert_eq!(opts.routing, None);
    }
}
