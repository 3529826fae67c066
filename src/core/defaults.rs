use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::tree::{self, Tree};

pub const CONFIG_FILE: &str = "scaffold.json";

/// Root configuration structure for scaffold.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via scaffold.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    /// Package whose declared version identifies the framework release.
    #[serde(default = "default_framework_package")]
    pub framework_package: String,

    /// Range used when the manifest does not declare the framework package.
    #[serde(default = "default_framework_version")]
    pub framework_version: String,

    /// File whose presence at the workspace root selects the vite flavor.
    #[serde(default = "default_build_tool_config")]
    pub build_tool_config: String,

    /// Package name to default version range. Entries from scaffold.json are
    /// merged over the built-in table.
    #[serde(default = "default_versions", deserialize_with = "merge_versions")]
    pub versions: BTreeMap<String, String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            framework_package: default_framework_package(),
            framework_version: default_framework_version(),
            build_tool_config: default_build_tool_config(),
            versions: default_versions(),
        }
    }
}

impl Defaults {
    /// Check every configured value. Ranges are npm specs (`^1.2.0 || ^2.0.0`,
    /// `>=1.2.0 <2.0.0`, `latest`, `workspace:*`), so only their shape is
    /// checked: non-empty and free of control characters.
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every invalid value, as `config.invalid_value` errors.
    pub fn problems(&self) -> Vec<Error> {
        let mut problems = Vec::new();

        if let Some(problem) = range_problem(&self.framework_version) {
            problems.push(Error::config_invalid_value(
                "frameworkVersion",
                Some(self.framework_version.clone()),
                problem,
            ));
        }

        for (name, range) in &self.versions {
            if let Some(problem) = range_problem(range) {
                problems.push(Error::config_invalid_value(
                    format!("versions.{}", name),
                    Some(range.clone()),
                    problem,
                ));
            }
        }

        if !is_bare_file_name(&self.build_tool_config) {
            problems.push(Error::config_invalid_value(
                "buildToolConfig",
                Some(self.build_tool_config.clone()),
                "must be a bare file name",
            ));
        }

        problems
    }

    /// Replace each invalid value with its built-in counterpart, keeping the
    /// valid overrides. Version entries without a built-in are dropped.
    pub fn sanitized(mut self) -> Self {
        let builtin = builtin_defaults();

        if range_problem(&self.framework_version).is_some() {
            self.framework_version = builtin.framework_version;
        }
        if !is_bare_file_name(&self.build_tool_config) {
            self.build_tool_config = builtin.build_tool_config;
        }

        self.versions.retain(|_, range| range_problem(range).is_none());
        for (name, range) in builtin.versions {
            self.versions.entry(name).or_insert(range);
        }

        self
    }

    /// Default range for `package`, if the table knows it.
    pub fn version_for(&self, package: &str) -> Option<&str> {
        self.versions.get(package).map(String::as_str)
    }
}

fn range_problem(range: &str) -> Option<&'static str> {
    if range.trim().is_empty() {
        Some("must not be empty")
    } else if range.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    }
}

fn is_bare_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\'])
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_framework_package() -> String {
    "@remix-run/dev".to_string()
}

fn default_framework_version() -> String {
    "^2.8.1".to_string()
}

fn default_build_tool_config() -> String {
    "vite.config.ts".to_string()
}

fn default_versions() -> BTreeMap<String, String> {
    [
        ("@remix-run/dev", "^2.8.1"),
        ("isbot", "^4.4.0"),
        ("react", "^18.2.0"),
        ("react-dom", "^18.2.0"),
        ("@types/react", "^18.2.0"),
        ("@types/react-dom", "^18.2.0"),
        ("eslint", "^8.56.0"),
        ("typescript", "^5.3.3"),
        ("tailwindcss", "^3.3.0"),
        ("@testing-library/react", "^14.1.2"),
        ("@testing-library/jest-dom", "^6.2.0"),
        ("@testing-library/user-event", "^14.5.2"),
    ]
    .into_iter()
    .map(|(name, range)| (name.to_string(), range.to_string()))
    .collect()
}

fn merge_versions<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut versions = default_versions();
    versions.extend(overrides);
    Ok(versions)
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging scaffold.json over built-in defaults.
/// If scaffold.json is missing or invalid, returns built-in defaults.
pub fn load_defaults<T: Tree + ?Sized>(tree: &T) -> Defaults {
    load_config(tree).defaults
}

/// Load the full scaffold.json config. An unreadable or malformed file falls
/// back to built-in defaults; individual invalid values fall back to their
/// built-in counterparts while the valid overrides are kept.
pub fn load_config<T: Tree + ?Sized>(tree: &T) -> ScaffoldConfig {
    let config = match read_config(tree) {
        Ok(config) => config,
        Err(e) => {
            log_status!("config", "Ignoring {}: {}", CONFIG_FILE, describe(&e));
            return ScaffoldConfig::default();
        }
    };

    let problems = config.defaults.problems();
    if problems.is_empty() {
        return config;
    }
    for e in &problems {
        log_status!("config", "Ignoring value in {}: {}", CONFIG_FILE, describe(e));
    }

    ScaffoldConfig {
        defaults: config.defaults.sanitized(),
    }
}

/// Load scaffold.json, surfacing parse and validation errors.
/// A missing file yields built-in defaults.
pub fn load_config_strict<T: Tree + ?Sized>(tree: &T) -> Result<ScaffoldConfig> {
    let config = read_config(tree)?;
    config.defaults.validate()?;
    Ok(config)
}

fn read_config<T: Tree + ?Sized>(tree: &T) -> Result<ScaffoldConfig> {
    if !tree.is_file(CONFIG_FILE) {
        return Ok(ScaffoldConfig::default());
    }
    tree::read_json(tree, CONFIG_FILE)
}

fn describe(err: &Error) -> String {
    match err.details.get("problem").or_else(|| err.details.get("error")) {
        Some(detail) => format!("{} ({})", err.message, detail.as_str().unwrap_or_default()),
        None => err.message.clone(),
    }
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
