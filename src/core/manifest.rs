//! Typed view of the workspace `package.json` dependency tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::{self, Tree};

pub const MANIFEST_FILE: &str = "package.json";

/// Which dependency table a version requirement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    Direct,
    Development,
}

/// Dependency tables of a manifest. Missing tables deserialize as empty;
/// every other manifest field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn table(&self, kind: DependencyKind) -> &BTreeMap<String, String> {
        match kind {
            DependencyKind::Direct => &self.dependencies,
            DependencyKind::Development => &self.dev_dependencies,
        }
    }

    /// Declared requirement for `package`, development table first.
    pub fn declared(&self, package: &str) -> Option<(DependencyKind, &str)> {
        [DependencyKind::Development, DependencyKind::Direct]
            .into_iter()
            .find_map(|kind| self.table(kind).get(package).map(|v| (kind, v.as_str())))
    }
}

/// Read the workspace manifest from the tree root.
///
/// Always reads the current content; nothing is cached between calls.
pub fn read_manifest<T: Tree + ?Sized>(tree: &T) -> Result<Manifest> {
    tree::read_json(tree, MANIFEST_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    #[test]
    fn missing_tables_default_to_empty() {
        let manifest: Manifest = serde_json::from_str(r#"{"name": "ws"}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.dev_dependencies.is_empty());
    }

    #[test]
    fn declared_prefers_development_table() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "dependencies": {"react": "^18.0.0"},
                "devDependencies": {"react": "^18.3.1", "vite": "^5.0.0"}
            }"#,
        )
        .unwrap();

        assert_eq!(
            manifest.declared("react"),
            Some((DependencyKind::Development, "^18.3.1"))
        );
        assert_eq!(manifest.declared("left-pad"), None);
    }

    #[test]
    fn non_string_versions_fail_at_the_boundary() {
        let tree = MemoryTree::new().with_file("package.json", r#"{"dependencies": {"react": 18}}"#);
        let err = read_manifest(&tree).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn read_manifest_sees_latest_content() {
        let mut tree = MemoryTree::new().with_file("package.json", "{}");
        assert!(read_manifest(&tree).unwrap().declared("react").is_none());

        tree.write("package.json", r#"{"dependencies": {"react": "^18.2.0"}}"#)
            .unwrap();
        assert_eq!(
            read_manifest(&tree).unwrap().declared("react"),
            Some((DependencyKind::Direct, "^18.2.0"))
        );
    }
}
