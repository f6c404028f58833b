//! History entry construction
//!
//! A history entry is a full copy of a record's prior version, stored as a
//! new document in the history collection with three extra fields:
//!
//! | Field | Content |
//! |-------|---------|
//! | `original_id` | id of the record it archives |
//! | `archived_date` | archival time, e.g. `18/10/2026, 15:03:05 AEST` |
//! | `archived_by` | acting operator, or the unknown-actor sentinel |
//!
//! Entries are never updated or deleted.

use recordkeeper_core::{ObjectId, Record, ID_FIELD};

/// Back-reference to the archived record's id
pub const ORIGINAL_ID_FIELD: &str = "original_id";
/// Rendered archival time
pub const ARCHIVED_DATE_FIELD: &str = "archived_date";
/// Acting operator
pub const ARCHIVED_BY_FIELD: &str = "archived_by";

/// Default value of `archived_by` when no operator is known
pub const DEFAULT_UNKNOWN_ACTOR: &str = "unknown";

/// Build the history entry for `original`
///
/// The entry gets a freshly minted `_id` that differs from
/// `authoritative_id`. Fields of `original` named like the history fields
/// are overwritten. An empty `actor` counts as absent.
pub fn build_history_entry(
    original: &Record,
    authoritative_id: ObjectId,
    archived_date: String,
    actor: Option<&str>,
    unknown_actor: &str,
) -> Record {
    let mut entry = original.clone();

    let mut entry_id = ObjectId::new();
    while entry_id == authoritative_id {
        entry_id = ObjectId::new();
    }

    entry.insert(ID_FIELD, entry_id);
    entry.insert(ORIGINAL_ID_FIELD, authoritative_id);
    entry.insert(ARCHIVED_DATE_FIELD, archived_date);
    entry.insert(ARCHIVED_BY_FIELD, resolve_actor(actor, unknown_actor));
    entry
}

/// The actor to record, falling back to `unknown_actor`
pub fn resolve_actor<'a>(actor: Option<&'a str>, unknown_actor: &'a str) -> &'a str {
    match actor {
        Some(actor) if !actor.is_empty() => actor,
        _ => unknown_actor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordkeeper_core::Value;

    fn original(id: ObjectId) -> Record {
        [
            ("_id", Value::ObjectId(id)),
            ("name", Value::String("Widget".into())),
            ("v", Value::Int(1)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_entry_copies_fields_and_adds_history() {
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let entry = build_history_entry(
            &original(id),
            id,
            "18/10/2026, 15:03:05 AEST".to_string(),
            Some("editor"),
            DEFAULT_UNKNOWN_ACTOR,
        );

        assert_eq!(entry.get("name"), Some(&Value::String("Widget".into())));
        assert_eq!(entry.get("v"), Some(&Value::Int(1)));
        assert_eq!(entry.get(ORIGINAL_ID_FIELD), Some(&Value::ObjectId(id)));
        assert_eq!(
            entry.get(ARCHIVED_DATE_FIELD),
            Some(&Value::String("18/10/2026, 15:03:05 AEST".into()))
        );
        assert_eq!(
            entry.get(ARCHIVED_BY_FIELD),
            Some(&Value::String("editor".into()))
        );
    }

    #[test]
    fn test_entry_id_is_fresh() {
        let id = ObjectId::new();
        let entry = build_history_entry(&original(id), id, String::new(), None, "unknown");
        let entry_id = entry.id().and_then(Value::as_object_id).unwrap();
        assert_ne!(entry_id, id);
    }

    #[test]
    fn test_two_entries_have_distinct_ids() {
        let id = ObjectId::new();
        let a = build_history_entry(&original(id), id, String::new(), None, "unknown");
        let b = build_history_entry(&original(id), id, String::new(), None, "unknown");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_missing_or_empty_actor_uses_sentinel() {
        let id = ObjectId::new();
        for actor in [None, Some("")] {
            let entry = build_history_entry(&original(id), id, String::new(), actor, "unknown");
            assert_eq!(
                entry.get(ARCHIVED_BY_FIELD),
                Some(&Value::String("unknown".into()))
            );
        }
    }

    #[test]
    fn test_existing_history_fields_overwritten() {
        let id = ObjectId::new();
        let mut record = original(id);
        record.insert(ARCHIVED_BY_FIELD, "someone-else");
        record.insert(ORIGINAL_ID_FIELD, "bogus");

        let entry = build_history_entry(&record, id, String::new(), Some("editor"), "unknown");
        assert_eq!(entry.get(ORIGINAL_ID_FIELD), Some(&Value::ObjectId(id)));
        assert_eq!(
            entry.get(ARCHIVED_BY_FIELD),
            Some(&Value::String("editor".into()))
        );
    }

    #[test]
    fn test_original_untouched() {
        let id = ObjectId::new();
        let record = original(id);
        let before = record.clone();
        let _ = build_history_entry(&record, id, String::new(), None, "unknown");
        assert_eq!(record, before);
    }
}
