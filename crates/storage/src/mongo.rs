//! Networked document store over the MongoDB driver
//!
//! `MongoConnector` turns [`ConnectOptions`] and [`Credentials`] into a
//! driver client: the connection string comes from [`connection_uri`], the
//! pool and timeout settings are applied on top of the parsed options, and
//! a `ping` on the target database decides whether the connection is good.
//! Driver failures while connecting are classified with
//! [`ConnectError::from_driver_message`].
//!
//! # Value mapping
//!
//! | Value      | BSON                                  |
//! |------------|---------------------------------------|
//! | `Int`      | `Int32` when it fits, else `Int64`    |
//! | `Bytes`    | `Binary` with the generic subtype     |
//! | `ObjectId` | `ObjectId`                            |
//! | `Object` with one `$` key | parsed as extended JSON, e.g. `{"$date": ..}` |
//!
//! BSON types with no `Value` counterpart (dates, decimals, timestamps)
//! come back as their relaxed extended JSON object, which maps back to the
//! same BSON type on the next write.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{doc, oid, Binary, Bson, Document};
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, ReplaceOptions as DriverReplaceOptions};
use mongodb::sync::{Client, Collection, Database};
use recordkeeper_core::{
    connection_uri, redacted_uri, ConnectError, ConnectOptions, Connector, Credentials,
    DocumentStore, Filter, InsertOutcome, ObjectId, Record, ReplaceOptions, ReplaceOutcome,
    StoreError, StoreResult, Value, ID_FIELD,
};
use tracing::debug;

const DUPLICATE_KEY_CODE: i32 = 11000;
const IMMUTABLE_FIELD_CODE: i32 = 66;

/// [`Connector`] backed by a MongoDB deployment
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl MongoConnector {
    /// Create a connector
    pub fn new() -> Self {
        Self
    }
}

/// Driver options for one connection attempt
///
/// Parses the credential-bearing URI, then applies the pool size, the
/// server selection timeout and the socket timeout. The driver has no
/// per-socket inactivity timeout, so `socket_timeout` bounds how long a
/// pooled connection may sit idle.
///
/// # Errors
///
/// Returns `ConnectError` if the URI does not parse or, for `mongodb+srv`,
/// the SRV lookup fails.
pub fn client_options(
    options: &ConnectOptions,
    credentials: &Credentials,
) -> Result<ClientOptions, ConnectError> {
    let uri = connection_uri(options, credentials);
    // With the driver's sync API, parsing (including SRV resolution) blocks
    // on the driver's own runtime.
    let mut parsed =
        ClientOptions::parse(uri.as_str()).map_err(|e| classify(options, &e))?;

    parsed.max_pool_size = Some(options.max_pool_size);
    parsed.server_selection_timeout = Some(options.server_selection_timeout);
    parsed.max_idle_time = Some(options.socket_timeout);
    parsed.default_database = Some(options.database.clone());
    Ok(parsed)
}

fn classify(options: &ConnectOptions, err: &DriverError) -> ConnectError {
    ConnectError::from_driver_message(&options.host, &err.to_string())
}

impl Connector for MongoConnector {
    fn connect(
        &self,
        options: &ConnectOptions,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DocumentStore>, ConnectError> {
        let client_options = client_options(options, credentials)?;
        let client = Client::with_options(client_options).map_err(|e| classify(options, &e))?;
        let database = client.database(&options.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(|e| classify(options, &e))?;
        debug!(
            target: "recordkeeper::storage",
            uri = %redacted_uri(options, &credentials.username),
            database = %options.database,
            "driver connected"
        );
        Ok(Arc::new(MongoStore::new(database)))
    }
}

/// [`DocumentStore`] over one driver database handle
pub struct MongoStore {
    database: Database,
    name: String,
    closed: AtomicBool,
}

impl MongoStore {
    /// Wrap a driver database handle
    pub fn new(database: Database) -> Self {
        Self {
            name: database.name().to_string(),
            database,
            closed: AtomicBool::new(false),
        }
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

impl fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoStore")
            .field("database", &self.name)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

fn write_error_code(err: &DriverError) -> Option<i32> {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}

impl DocumentStore for MongoStore {
    fn database(&self) -> &str {
        &self.name
    }

    fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.check_open()?;
        let mut names = self
            .database
            .list_collection_names(None)
            .map_err(|e| StoreError::operation("listCollections", e.to_string()))?;
        names.sort();
        Ok(names)
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Record>> {
        self.check_open()?;
        let cursor = self
            .collection(collection)
            .find(filter_document(filter), None)
            .map_err(|e| StoreError::operation("find", e.to_string()))?;
        cursor
            .map(|doc| {
                doc.map(record_from_document)
                    .map_err(|e| StoreError::operation("find", e.to_string()))
            })
            .collect()
    }

    fn insert_one(&self, collection: &str, mut doc: Record) -> StoreResult<InsertOutcome> {
        self.check_open()?;
        let id = match doc.id().cloned() {
            None => {
                let id = ObjectId::new();
                doc.insert(ID_FIELD, id);
                id
            }
            Some(Value::ObjectId(id)) => id,
            Some(other) => {
                return Err(StoreError::InvalidDocument {
                    reason: format!("_id must be an ObjectId, got {}", other.type_name()),
                })
            }
        };

        self.collection(collection)
            .insert_one(record_to_document(&doc), None)
            .map_err(|e| match write_error_code(&e) {
                Some(DUPLICATE_KEY_CODE) => StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id,
                },
                _ => StoreError::operation("insertOne", e.to_string()),
            })?;
        debug!(target: "recordkeeper::storage", collection, %id, "inserted document");
        Ok(InsertOutcome { inserted_id: id })
    }

    fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Record,
        options: ReplaceOptions,
    ) -> StoreResult<ReplaceOutcome> {
        self.check_open()?;
        if let (Filter::ById(id), Some(existing)) = (filter, doc.id()) {
            if *existing != Value::ObjectId(*id) {
                return Err(StoreError::ImmutableId {
                    collection: collection.to_string(),
                });
            }
        }

        let driver_options = DriverReplaceOptions::builder()
            .upsert(options.upsert)
            .build();
        let result = self
            .collection(collection)
            .replace_one(filter_document(filter), record_to_document(&doc), driver_options)
            .map_err(|e| match write_error_code(&e) {
                Some(IMMUTABLE_FIELD_CODE) => StoreError::ImmutableId {
                    collection: collection.to_string(),
                },
                _ => StoreError::operation("replaceOne", e.to_string()),
            })?;

        let upserted_id = result
            .upserted_id
            .as_ref()
            .and_then(Bson::as_object_id)
            .map(|oid| ObjectId::from_bytes(oid.bytes()));
        Ok(ReplaceOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id,
        })
    }

    fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Query document for a [`Filter`]
pub fn filter_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::ById(id) => doc! { ID_FIELD: Bson::ObjectId(to_driver_id(*id)) },
        Filter::Eq { field, value } => {
            let mut query = Document::new();
            query.insert(field.as_str(), value_to_bson(value));
            query
        }
    }
}

fn to_driver_id(id: ObjectId) -> oid::ObjectId {
    oid::ObjectId::from_bytes(id.bytes())
}

/// Convert a record into a driver document
pub fn record_to_document(record: &Record) -> Document {
    record
        .iter()
        .map(|(field, value)| (field.clone(), value_to_bson(value)))
        .collect()
}

/// Convert a driver document into a record
pub fn record_from_document(doc: Document) -> Record {
    doc.into_iter()
        .map(|(field, value)| (field, bson_to_value(value)))
        .collect()
}

/// Convert a value into BSON
pub fn value_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => match i32::try_from(*i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*i),
        },
        Value::Float(f) => Bson::Double(*f),
        Value::String(s) => Bson::String(s.clone()),
        Value::Bytes(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        Value::ObjectId(id) => Bson::ObjectId(to_driver_id(*id)),
        Value::Array(items) => Bson::Array(items.iter().map(value_to_bson).collect()),
        Value::Object(map) => {
            if let Some(special) = extended_json(value) {
                return special;
            }
            Bson::Document(
                map.iter()
                    .map(|(k, v)| (k.clone(), value_to_bson(v)))
                    .collect(),
            )
        }
    }
}

/// Single-key `$` objects such as `{"$date": ...}` parsed as extended JSON
fn extended_json(value: &Value) -> Option<Bson> {
    let Value::Object(map) = value else {
        return None;
    };
    let mut keys = map.keys();
    match (keys.next(), keys.next()) {
        (Some(key), None) if key.starts_with('$') => {}
        _ => return None,
    }
    match Bson::try_from(to_json(value)?).ok()? {
        Bson::Document(_) => None,
        special => Some(special),
    }
}

fn to_json(value: &Value) -> Option<serde_json::Value> {
    Some(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::Number(serde_json::Number::from_f64(*f)?),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(_) => return None,
        Value::ObjectId(id) => serde_json::json!({ "$oid": id.to_hex() }),
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Option<_>>()?)
        }
        Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| Some((k.clone(), to_json(v)?)))
                .collect::<Option<_>>()?,
        ),
    })
}

/// Convert BSON into a value
pub fn bson_to_value(bson: Bson) -> Value {
    match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Int(i64::from(i)),
        Bson::Int64(i) => Value::Int(i),
        Bson::Double(f) => Value::Float(f),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(oid) => Value::ObjectId(ObjectId::from_bytes(oid.bytes())),
        Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes,
        }) => Value::Bytes(bytes),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_value).collect()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_value(v)))
                .collect(),
        ),
        other => Value::from(other.into_relaxed_extjson()),
    }
}
