//! Package version lookup and build-tool detection.
//!
//! Lookups never fail for an absent package or config file: absence is an
//! ordinary outcome and shows up in the return value.

use std::path::Path;

use serde::Serialize;

use crate::defaults::Defaults;
use crate::manifest::Manifest;

/// Config file whose presence at the workspace root selects [`BuildToolFlavor::Vite`].
pub const VITE_CONFIG_FILE: &str = "vite.config.ts";

/// Build pipeline a workspace uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildToolFlavor {
    Classic,
    Vite,
}

impl BuildToolFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildToolFlavor::Classic => "classic",
            BuildToolFlavor::Vite => "vite",
        }
    }
}

/// Declared requirement for `package`: devDependencies first, then
/// dependencies. `None` when neither table has it.
pub fn resolve_package_version<'a>(manifest: &'a Manifest, package: &str) -> Option<&'a str> {
    manifest.declared(package).map(|(_, version)| version)
}

/// Classify the build tool by checking for `vite.config.ts` directly under `root`.
pub fn classify_build_tool(root: &Path) -> BuildToolFlavor {
    classify_with_config(root, VITE_CONFIG_FILE)
}

fn classify_with_config(root: &Path, config_file: &str) -> BuildToolFlavor {
    if root.join(config_file).is_file() {
        BuildToolFlavor::Vite
    } else {
        BuildToolFlavor::Classic
    }
}

/// Resolver bound to an immutable defaults table.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    defaults: Defaults,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(Defaults::default())
    }
}

impl VersionResolver {
    pub fn new(defaults: Defaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Declared framework version, or the configured fallback.
    pub fn resolve_framework_version(&self, manifest: &Manifest) -> String {
        resolve_package_version(manifest, &self.defaults.framework_package)
            .unwrap_or(&self.defaults.framework_version)
            .to_string()
    }

    /// Declared version of `package`, or its default range if the table knows it.
    pub fn version_or_default(&self, manifest: &Manifest, package: &str) -> Option<String> {
        resolve_package_version(manifest, package)
            .or_else(|| self.defaults.version_for(package))
            .map(str::to_string)
    }

    /// Same as [`classify_build_tool`], honoring a configured file name.
    pub fn classify_build_tool(&self, root: &Path) -> BuildToolFlavor {
        classify_with_config(root, &self.defaults.build_tool_config)
    }
}
