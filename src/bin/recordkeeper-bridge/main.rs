//! Recordkeeper bridge - serves JSON commands over stdin/stdout.
//!
//! Each stdin line is one command, each stdout line is its response. Logs
//! go to stderr, filtered by `RECORDKEEPER_LOG` (default `info`).
//! Connections go to the configured MongoDB deployment, or to the
//! in-process store when the scheme is `memory`.

mod commands;

use std::io;
use std::path::Path;
use std::process;
use std::sync::Arc;

use recordkeeper_core::Connector;
use recordkeeper_engine::EditorConfig;
use recordkeeper_executor::{bridge, MemoryConnector, MongoConnector, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::build_cli;

fn main() {
    init_tracing();

    let matches = build_cli().get_matches();
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(recordkeeper_engine::CONFIG_FILE_NAME);

    let config = match load_config(Path::new(config_path), !matches.get_flag("no-write-config")) {
        Ok(config) => config,
        Err(e) => {
            error!(target: "recordkeeper::bridge", path = config_path, error = %e, "invalid configuration");
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let connector = build_connector(&config);
    let mut session = match Session::new(connector, config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    info!(target: "recordkeeper::bridge", version = env!("CARGO_PKG_VERSION"), "bridge ready");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let served = bridge::serve(&mut session, stdin.lock(), stdout.lock());

    if let Err(e) = session.close() {
        error!(target: "recordkeeper::bridge", error = %e, "closing session on exit");
    }

    match served {
        Ok(handled) => info!(target: "recordkeeper::bridge", handled, "bridge stopped"),
        Err(e) => {
            error!(target: "recordkeeper::bridge", error = %e, "bridge I/O failed");
            process::exit(1);
        }
    }
}

fn build_connector(config: &EditorConfig) -> Arc<dyn Connector> {
    if !config.uses_memory_store() {
        info!(target: "recordkeeper::bridge", scheme = %config.connection.scheme, "using MongoDB driver");
        return Arc::new(MongoConnector::new());
    }
    let connector = MemoryConnector::new();
    for account in &config.memory.accounts {
        connector.add_account(account.username.clone(), account.password.clone());
    }
    info!(target: "recordkeeper::bridge", accounts = config.memory.accounts.len(), "using in-process store");
    Arc::new(connector)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("RECORDKEEPER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: &Path, write_default: bool) -> Result<EditorConfig, recordkeeper_engine::ConfigError> {
    if write_default {
        EditorConfig::write_default_if_missing(path)?;
    }
    if path.exists() {
        EditorConfig::from_file(path)
    } else {
        Ok(EditorConfig::default())
    }
}
