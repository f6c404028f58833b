//! Test modules for the executor crate.


use std::sync::Arc;

use chrono::{TimeZone, Utc};
use recordkeeper_core::ArchiveZone;

use crate::{EditorConfig, MemoryConnector, SaveCoordinator, Session};

pub(crate) const USERNAME: &str = "operator";
pub(crate) const PASSWORD: &str = "secret";
pub(crate) const ARCHIVED_AT: &str = "18/10/2026, 15:03:05 AEST";

/// Disconnected session over a fresh in-memory connector with one account
/// and a fixed clock.
pub(crate) fn create_test_session() -> (Arc<MemoryConnector>, Session) {
    let connector = Arc::new(MemoryConnector::new().with_account(USERNAME, PASSWORD));
    let coordinator = SaveCoordinator::new(ArchiveZone::aest(), "unknown")
        .with_clock(|| Utc.with_ymd_and_hms(2026, 10, 18, 4, 3, 5).unwrap());
    let session = Session::new(connector.clone(), EditorConfig::default())
        .unwrap()
        .with_coordinator(coordinator);
    (connector, session)
}

/// Connected variant of [`create_test_session`].
pub(crate) fn create_connected_session() -> (Arc<MemoryConnector>, Session) {
    let (connector, mut session) = create_test_session();
    session
        .execute(crate::Command::Connect {
            username: USERNAME.into(),
            password: PASSWORD.into(),
        })
        .unwrap();
    (connector, session)
}
