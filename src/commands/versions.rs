use clap::Args;
use serde::Serialize;

use scaffold::defaults;
use scaffold::manifest::{self, DependencyKind};
use scaffold::versions::{BuildToolFlavor, VersionResolver};
use scaffold::FsTree;

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct VersionsArgs {
    /// Package to resolve (repeatable)
    #[arg(short, long = "package", value_name = "NAME")]
    packages: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command", rename = "versions", rename_all = "camelCase")]
pub struct VersionsOutput {
    framework_package: String,
    framework_version: String,
    build_tool: BuildToolFlavor,
    packages: Vec<PackageVersion>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    /// Which table declared it; absent when the version is a default.
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_in: Option<DependencyKind>,
}

pub fn run(args: VersionsArgs, global: &GlobalArgs) -> CmdResult<VersionsOutput> {
    let tree = FsTree::new(&global.root);
    let resolver = VersionResolver::new(defaults::load_defaults(&tree));
    let manifest = manifest::read_manifest(&tree)?;

    let packages: Vec<PackageVersion> = args
        .packages
        .iter()
        .map(|name| PackageVersion {
            name: name.clone(),
            version: resolver.version_or_default(&manifest, name),
            declared_in: manifest.declared(name).map(|(kind, _)| kind),
        })
        .collect();

    // Exit 1 when a requested package is neither declared nor known.
    let exit_code = if packages.iter().any(|p| p.version.is_none()) {
        1
    } else {
        0
    };

    Ok((
        VersionsOutput {
            framework_package: resolver.defaults().framework_package.clone(),
            framework_version: resolver.resolve_framework_version(&manifest),
            build_tool: resolver.classify_build_tool(&global.root),
            packages,
        },
        exit_code,
    ))
}
