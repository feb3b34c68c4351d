use crate::config::Config;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Track bicycles entering and leaving a parking lot
#[derive(Parser, Debug)]
#[command(name = "bike-parking", version)]
#[command(about = "Track bicycles entering and leaving a parking lot", long_about = None)]
pub struct CliArgs {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the record files (overrides the config file)
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive menu (default)
    Menu,

    #[command(flatten)]
    Operation(Operation),
}

/// One parking operation, run once
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Register a new user
    RegisterUser {
        #[arg(value_parser = trimmed)]
        identity: String,
        #[arg(value_parser = trimmed)]
        name: String,
        #[arg(value_parser = trimmed)]
        email: String,
    },

    /// Delete a user who owns no bicycles
    DeleteUser {
        #[arg(value_parser = trimmed)]
        identity: String,
    },

    /// Register a bicycle for an existing user
    RegisterBike {
        #[arg(value_parser = trimmed)]
        serial: String,
        #[arg(value_parser = trimmed)]
        owner: String,
        #[arg(value_parser = trimmed)]
        brand: String,
        #[arg(value_parser = trimmed)]
        model: String,
    },

    /// Delete a bicycle
    DeleteBike {
        #[arg(value_parser = trimmed)]
        serial: String,
    },

    /// Record a bicycle entering the lot
    CheckIn {
        #[arg(value_parser = trimmed)]
        identity: String,
        #[arg(value_parser = trimmed)]
        serial: String,
    },

    /// Record a bicycle leaving the lot
    CheckOut {
        #[arg(value_parser = trimmed)]
        identity: String,
        #[arg(value_parser = trimmed)]
        serial: String,
    },

    /// Record a movement given as IN or OUT
    Record {
        #[arg(value_parser = trimmed)]
        action: String,
        #[arg(value_parser = trimmed)]
        identity: String,
        #[arg(value_parser = trimmed)]
        serial: String,
    },

    /// List the bicycles owned by a user
    ListBikes {
        #[arg(value_parser = trimmed)]
        identity: String,
    },

    /// Show whether a bicycle is parked
    Status {
        #[arg(value_parser = trimmed)]
        serial: String,
    },
}

fn trimmed(value: &str) -> Result<String, String> {
    Ok(value.trim().to_string())
}

impl CliArgs {
    /// Build the configuration from `--config` and `--data-dir`
    ///
    /// Without `--config` the defaults are used. `--data-dir` wins over the
    /// data directory of the file.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        Ok(match &self.data_dir {
            Some(dir) => config.with_data_dir(dir.clone()),
            None => config,
        })
    }
}
