//! Collection record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide key/value CRUD over the eight named CRM collections.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - A record is keyed by `(collection, id)`; `add` never overwrites.
//! - `get_all` returns records in first-insertion order; `put` on an existing
//!   key keeps that position.
//! - Bulk writes are all-or-nothing.
//! - Read paths reject undecodable bodies instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::activity::ActivityLog;
use crate::model::client::Client;
use crate::model::commitment::Commitment;
use crate::model::document::Document;
use crate::model::interaction::Interaction;
use crate::model::task::Task;
use crate::model::team::Team;
use crate::model::user::User;
use log::debug;
use rusqlite::{params, Connection, ErrorCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Named collection (object store) inside the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clients,
    Tasks,
    Interactions,
    Users,
    Teams,
    ActivityLogs,
    Commitments,
    Documents,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Self::Clients,
        Self::Tasks,
        Self::Interactions,
        Self::Users,
        Self::Teams,
        Self::ActivityLogs,
        Self::Commitments,
        Self::Documents,
    ];

    /// Stable collection name used as the storage key prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Tasks => "tasks",
            Self::Interactions => "interactions",
            Self::Users => "users",
            Self::Teams => "teams",
            Self::ActivityLogs => "activityLogs",
            Self::Commitments => "commitments",
            Self::Documents => "documents",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-level error for record persistence and decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// `add` hit an existing key.
    DuplicateKey {
        collection: Collection,
        id: String,
    },
    /// Record could not be encoded to JSON.
    Encode(serde_json::Error),
    /// Persisted body could not be decoded.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey { collection, id } => {
                write!(f, "key `{id}` already exists in {collection}")
            }
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Entity that lives in exactly one collection under a string key.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn record_id(&self) -> &str {
                &self.id
            }
        }
    };
}

impl_record!(Client, Collection::Clients);
impl_record!(Task, Collection::Tasks);
impl_record!(Interaction, Collection::Interactions);
impl_record!(User, Collection::Users);
impl_record!(Team, Collection::Teams);
impl_record!(ActivityLog, Collection::ActivityLogs);
impl_record!(Commitment, Collection::Commitments);
impl_record!(Document, Collection::Documents);

/// Repository interface over named collections.
pub trait RecordStore {
    /// Returns every record of `T`'s collection in insertion order.
    fn get_all<T: Record>(&self) -> StoreResult<Vec<T>>;
    /// Inserts a new record; fails with `DuplicateKey` if the key exists.
    fn add<T: Record>(&self, item: &T) -> StoreResult<String>;
    /// Inserts or replaces a record by key.
    fn put<T: Record>(&self, item: &T) -> StoreResult<String>;
    /// Deletes one record. Missing keys are not an error.
    fn delete_item(&self, collection: Collection, id: &str) -> StoreResult<()>;
    /// Deletes every listed key in one transaction. Missing keys are skipped.
    fn delete_items(&self, keys: &[(Collection, String)]) -> StoreResult<()>;
    /// Inserts all records in one transaction.
    fn bulk_add<T: Record>(&self, items: &[T]) -> StoreResult<()>;
    /// Upserts all records in one transaction.
    fn bulk_put<T: Record>(&self, items: &[T]) -> StoreResult<()>;
    /// Returns the number of records in one collection.
    fn count(&self, collection: Collection) -> StoreResult<u64>;
    /// Removes every record from every collection.
    fn clear_db(&self) -> StoreResult<()>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `records` table is absent.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        for table in ["records", "settings"] {
            if !table_exists(conn, table)? {
                return Err(StoreError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        self.conn
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get_all<T: Record>(&self) -> StoreResult<Vec<T>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, body
             FROM records
             WHERE collection = ?1
             ORDER BY seq ASC;",
        )?;
        let mut rows = stmt.query([T::COLLECTION.as_str()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let body: String = row.get("body")?;
            let item = serde_json::from_str::<T>(&body).map_err(|err| {
                StoreError::InvalidData(format!(
                    "cannot decode `{id}` in {}: {err}",
                    T::COLLECTION
                ))
            })?;
            items.push(item);
        }
        Ok(items)
    }

    fn add<T: Record>(&self, item: &T) -> StoreResult<String> {
        insert_record(self.conn, item)
    }

    fn put<T: Record>(&self, item: &T) -> StoreResult<String> {
        upsert_record(self.conn, item)
    }

    fn delete_item(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
            params![collection.as_str(), id],
        )?;
        debug!(
            "event=record_delete module=repo status=ok collection={} changed={}",
            collection, changed
        );
        Ok(())
    }

    fn delete_items(&self, keys: &[(Collection, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (collection, id) in keys {
            tx.execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
                params![collection.as_str(), id],
            )?;
        }
        tx.commit()?;
        debug!(
            "event=record_delete_many module=repo status=ok count={}",
            keys.len()
        );
        Ok(())
    }

    fn bulk_add<T: Record>(&self, items: &[T]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for item in items {
            insert_record(&tx, item)?;
        }
        tx.commit()?;
        debug!(
            "event=record_bulk_add module=repo status=ok collection={} count={}",
            T::COLLECTION,
            items.len()
        );
        Ok(())
    }

    fn bulk_put<T: Record>(&self, items: &[T]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for item in items {
            upsert_record(&tx, item)?;
        }
        tx.commit()?;
        debug!(
            "event=record_bulk_put module=repo status=ok collection={} count={}",
            T::COLLECTION,
            items.len()
        );
        Ok(())
    }

    fn count(&self, collection: Collection) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1;",
            [collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn clear_db(&self) -> StoreResult<()> {
        self.conn.execute("DELETE FROM records;", [])?;
        Ok(())
    }
}

fn encode<T: Record>(item: &T) -> StoreResult<String> {
    serde_json::to_string(item).map_err(StoreError::Encode)
}

fn insert_record<T: Record>(conn: &Connection, item: &T) -> StoreResult<String> {
    let id = item.record_id().to_string();
    let body = encode(item)?;
    let result = conn.execute(
        "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3);",
        params![T::COLLECTION.as_str(), id.as_str(), body],
    );

    match result {
        Ok(_) => Ok(id),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::DuplicateKey {
                collection: T::COLLECTION,
                id,
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn upsert_record<T: Record>(conn: &Connection, item: &T) -> StoreResult<String> {
    let id = item.record_id().to_string();
    let body = encode(item)?;
    conn.execute(
        "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)
         ON CONFLICT (collection, id) DO UPDATE SET
            body = excluded.body,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![T::COLLECTION.as_str(), id.as_str(), body],
    )?;
    Ok(id)
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
