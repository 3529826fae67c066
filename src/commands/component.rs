use clap::Args;
use serde::Serialize;

use scaffold::artifact::NameAndDirectoryFormat;
use scaffold::component::{self, BarrelOutcome, ComponentOptions, NormalizedComponentOptions};
use scaffold::tree::FileChange;
use scaffold::validation;
use scaffold::{FsTree, StagingTree};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ComponentArgs {
    /// Component name (e.g. my-button)
    name: Option<String>,

    /// Full options as JSON (inline, @file, or - for stdin); flags are ignored when set
    #[arg(long, value_name = "JSON")]
    json: Option<String>,

    /// Project that owns the component
    #[arg(short, long)]
    project: Option<String>,

    /// Directory for the component
    #[arg(short, long)]
    directory: Option<String>,

    /// Naming format: as-provided or derived
    #[arg(long)]
    format: Option<String>,

    /// Place the file directly in the directory instead of a component folder
    #[arg(long)]
    flat: bool,

    #[arg(long)]
    pascal_case_files: bool,

    #[arg(long)]
    pascal_case_directory: bool,

    /// Generate JavaScript (index.js barrel) instead of TypeScript
    #[arg(long)]
    js: bool,

    /// Re-export the component from the project's barrel file
    #[arg(long)]
    export: bool,

    #[arg(long)]
    routing: bool,

    #[arg(long)]
    in_source_tests: bool,

    #[arg(long)]
    skip_tests: bool,

    /// Add the barrel export even if an identical one exists
    #[arg(long)]
    allow_duplicate_exports: bool,

    /// Show the changes without writing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command", rename = "component", rename_all = "camelCase")]
pub struct ComponentOutput {
    options: NormalizedComponentOptions,
    barrel: BarrelOutcome,
    dry_run: bool,
    changes: Vec<FileChange>,
}

pub fn run(args: ComponentArgs, global: &GlobalArgs) -> CmdResult<ComponentOutput> {
    let dry_run = args.dry_run;
    let options = build_options(args)?;

    let mut tree = StagingTree::new(FsTree::new(&global.root));
    let normalized = component::normalize_options(&tree, &options)?;
    let barrel = component::add_exports_to_barrel(&mut tree, &normalized)?;

    let changes = tree.changes();
    if !dry_run {
        tree.commit()?;
    }

    Ok((
        ComponentOutput {
            options: normalized,
            barrel,
            dry_run,
            changes,
        },
        0,
    ))
}

fn build_options(args: ComponentArgs) -> scaffold::Result<ComponentOptions> {
    if let Some(spec) = args.json.as_deref() {
        return crate::commands::parse_json_spec(spec);
    }

    let name = validation::require(args.name, "name", "Provide a component name or --json")?;
    let format = args
        .format
        .as_deref()
        .map(NameAndDirectoryFormat::from_str)
        .transpose()?;

    Ok(ComponentOptions {
        name,
        project: args.project,
        directory: args.directory,
        name_and_directory_format: format,
        flat: args.flat,
        pascal_case_files: args.pascal_case_files,
        pascal_case_directory: args.pascal_case_directory,
        js: args.js,
        export: args.export,
        routing: args.routing.then_some(true),
        in_source_tests: args.in_source_tests.then_some(true),
        skip_tests: args.skip_tests,
        allow_duplicate_exports: args.allow_duplicate_exports,
    })
}
