//! boardkeep CLI.

use boardkeep_cli::cli::{Cli, Command};
use boardkeep_cli::commands::{run_discard, run_identity, run_inspect, run_list, run_status};
use boardkeep_cli::logging::{LogConfig, init_logging};
use boardkeep_cli::settings::BoardkeepSettings;
use boardkeep_cli::summary::{
    print_discard, print_identity, print_inspect, print_list, print_status,
};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&LogConfig::from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let settings = BoardkeepSettings::load(cli.config.as_deref());
    tracing::debug!("Checkpoints in {}", settings.store().dir().display());

    let result = match &cli.command {
        Command::Identity(args) => run_identity(args, &settings).map(|r| print_identity(&r)),
        Command::Inspect(args) => run_inspect(args).map(|r| print_inspect(&r)),
        Command::Status(args) => run_status(args, &settings).map(|r| print_status(&r)),
        Command::List => run_list(&settings).map(|r| print_list(&r)),
        Command::Discard(args) => run_discard(args, &settings).map(|r| print_discard(&r)),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
