use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{component, versions};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(version = VERSION)]
#[command(about = "Generator helpers for JavaScript monorepos")]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    root: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve framework and package versions, and detect the build tool
    Versions(versions::VersionsArgs),
    /// Normalize component options and export the component from its barrel
    Component(component::ComponentArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        root: std::path::PathBuf::from(&cli.root),
    };

    let (json_result, exit_code) = match cli.command {
        Commands::Versions(args) => output::map_cmd_result_to_json(versions::run(args, &global)),
        Commands::Component(args) => {
            output::map_cmd_result_to_json(component::run(args, &global))
        }
    };

    output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
