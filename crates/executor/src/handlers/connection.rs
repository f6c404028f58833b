//! Connection command handlers.

use recordkeeper_core::{Connector, Credentials};
use recordkeeper_engine::{EditorConfig, StoreSession};
use tracing::{info, warn};

use crate::{Output, Result};

/// Handle Connect command.
///
/// Any open session is closed first, so a failed connect always leaves the
/// caller disconnected.
pub fn connect(
    current: &mut Option<StoreSession>,
    connector: &dyn Connector,
    config: &EditorConfig,
    credentials: Credentials,
) -> Result<Output> {
    close_current(current);

    let options = config.connect_options();
    let session = StoreSession::open(connector, &options, &credentials)?;
    let message = format!(
        "Connected to {} database successfully",
        session.database()
    );
    *current = Some(session);
    Ok(Output::Connected { message })
}

/// Handle Status command.
pub fn status(current: &Option<StoreSession>) -> Result<Output> {
    Ok(Output::Status {
        connected: current.is_some(),
    })
}

/// Handle Disconnect command.
pub fn disconnect(current: &mut Option<StoreSession>) -> Result<Output> {
    match current.take() {
        Some(session) => {
            let database = session.database().to_string();
            session.close()?;
            info!(target: "recordkeeper::executor", %database, "disconnected");
        }
        None => {
            info!(target: "recordkeeper::executor", "disconnect without a session");
        }
    }
    Ok(Output::Disconnected)
}

fn close_current(current: &mut Option<StoreSession>) {
    if let Some(previous) = current.take() {
        let database = previous.database().to_string();
        if let Err(e) = previous.close() {
            warn!(
                target: "recordkeeper::executor",
                %database,
                error = %e,
                "closing previous session failed"
            );
        }
    }
}
