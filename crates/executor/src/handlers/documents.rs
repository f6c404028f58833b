//! Document command handlers.

use recordkeeper_core::{Record, Value};
use recordkeeper_engine::{
    load_collection, load_history, EditorConfig, SaveCoordinator, SaveRequest, StoreSession,
};

use crate::{Output, Result};

/// Fields of a Save command
#[derive(Debug)]
pub struct SaveArgs {
    pub collection: String,
    pub history_collection: Option<String>,
    pub document: Option<Record>,
    pub original_document: Option<Record>,
    pub needs_history: bool,
    pub username: Option<String>,
}

/// Handle Load command.
pub fn load(current: Option<&StoreSession>, collection: &str) -> Result<Output> {
    let records = load_collection(current, collection)?;
    Ok(Output::Records(records))
}

/// Handle Save command.
///
/// A missing or empty history collection falls back to the configured
/// suffix applied to the primary collection name.
pub fn save(
    current: Option<&StoreSession>,
    coordinator: &SaveCoordinator,
    config: &EditorConfig,
    args: SaveArgs,
) -> Result<Output> {
    let history_collection = match args.history_collection {
        Some(name) if !name.is_empty() => name,
        _ => config.history_collection_for(&args.collection),
    };

    let mut request =
        SaveRequest::new(args.collection, history_collection).with_history(args.needs_history);
    if let Some(document) = args.document {
        request = request.with_document(document);
    }
    if let Some(original) = args.original_document {
        request = request.with_original(original);
    }
    if let Some(actor) = args.username {
        request = request.with_actor(actor);
    }

    let outcome = coordinator.save(current, request)?;
    Ok(Output::Saved {
        id: outcome.id,
        history_records_created: outcome.history_records_created,
        matched_count: outcome.replace.matched_count,
        modified_count: outcome.replace.modified_count,
        upserted_count: outcome.replace.upserted_count,
        upserted_id: outcome.replace.upserted_id,
    })
}

/// Handle History command.
pub fn history(
    current: Option<&StoreSession>,
    history_collection: &str,
    id: &Value,
) -> Result<Output> {
    let records = load_history(current, history_collection, Some(id))?;
    Ok(Output::Records(records))
}
