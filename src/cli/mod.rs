// CLI module
// Command-line interface, logging setup and the interactive menu

mod args;
mod commands;
pub mod menu;

pub use args::{CliArgs, Command, Operation};

use crate::core::ParkingEngine;
use crate::store::CsvStore;
use anyhow::Context;
use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing values, or --help), clap
/// displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Open the record store and run the requested command
///
/// Without a subcommand the interactive menu starts.
///
/// # Errors
///
/// Returns an error if the configuration or the store cannot be loaded, or
/// if a one-shot operation is rejected.
pub fn run(args: CliArgs) -> anyhow::Result<()> {
    setup_logging(args.verbose);

    let config = args.load_config()?;
    let store = CsvStore::open(&config).with_context(|| {
        format!("Cannot open records in {}", config.data_dir.display())
    })?;
    tracing::debug!(data_dir = %config.data_dir.display(), "record store opened");

    let mut engine = ParkingEngine::new(store);
    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&mut engine),
        Command::Operation(operation) => {
            let message = operation.execute(&mut engine)?;
            println!("OK: {message}");
            Ok(())
        }
    }
}

/// Install the tracing subscriber, writing to stderr
///
/// `-v` raises the level from WARN to INFO, `-vv` to DEBUG and `-vvv` to
/// TRACE. `RUST_LOG` directives are honored too.
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
