//! Clap command definition.

use clap::{Arg, Command};

use recordkeeper_engine::CONFIG_FILE_NAME;

/// Build the bridge command line.
pub fn build_cli() -> Command {
    Command::new("recordkeeper-bridge")
        .about("JSON line bridge for versioned record saves")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Configuration file (default: recordkeeper.toml)")
                .default_value(CONFIG_FILE_NAME),
        )
        .arg(
            Arg::new("no-write-config")
                .long("no-write-config")
                .help("Do not create a default configuration file when none exists")
                .action(clap::ArgAction::SetTrue),
        )
}
