//! Small SQLite-backed key-value store holding JSON-encoded values.
//!
//! The relay keeps its persisted settings here (watch account credentials,
//! API endpoint overrides). Values are stored as JSON text so that any
//! `serde` type can round-trip through the store.

mod async_kvdb;

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use async_kvdb::AsyncKVDb;

const TABLENAME: &str = "kvstore";
const KEY_FIELD: &str = "key";
const VALUE_FIELD: &str = "value";

#[derive(Error, Debug)]
pub enum KVStoreError {
    #[error("SQLite error: {0}")]
    SQLite(#[from] rusqlite::Error),
    #[error("could not (de)serialize value: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub struct KVDb(Connection);

impl KVDb {
    /// Open (creating if needed) the store at `path`. `":memory:"` gives a
    /// private in-memory store.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        let path = path.as_ref();
        // Create directory for DB if it doesn't already exist
        std::fs::create_dir_all(path.parent().unwrap_or(Path::new("")))?;
        log::debug!("Opening key-value store at {}", path.display());

        let connection = Connection::open(path)?;
        // journal_mode returns the resulting mode as a row, so it can't go through execute()
        let _: String = connection.query_row("PRAGMA journal_mode=WAL", [], |r| r.get(0))?;
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS '{TABLENAME}' (
                {KEY_FIELD} TEXT PRIMARY KEY NOT NULL,
                {VALUE_FIELD} TEXT NOT NULL
                )"
            ),
            [],
        )?;

        Ok(KVDb(connection))
    }

    fn select(&self, key: &str) -> Result<Option<String>, KVStoreError> {
        self.0
            .query_row(
                &format!("SELECT {VALUE_FIELD} FROM '{TABLENAME}' WHERE {KEY_FIELD} = ?1"),
                [key],
                |r| r.get::<_, String>(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get<T>(&self, key: impl AsRef<str>) -> Result<Option<T>, KVStoreError>
    where
        T: DeserializeOwned,
    {
        self.select(key.as_ref())?
            .map(|v| serde_json::from_str::<T>(&v))
            .transpose()
            .map_err(Into::into)
    }

    /// Store an already JSON-encoded value.
    pub fn set_raw(&self, key: impl AsRef<str>, value_json: &str) -> Result<(), KVStoreError> {
        let updated = self.0.execute(
            &format!(
                "INSERT INTO '{TABLENAME}' ({KEY_FIELD}, {VALUE_FIELD}) VALUES (?1, ?2)
                ON CONFLICT({KEY_FIELD}) DO UPDATE SET {VALUE_FIELD}=?2"
            ),
            params![key.as_ref(), value_json],
        )?;
        log::trace!("Upserted {} row(s) for key '{}'", updated, key.as_ref());
        Ok(())
    }

    pub fn set<V>(&self, key: impl AsRef<str>, value: &V) -> Result<(), KVStoreError>
    where
        V: Serialize + ?Sized,
    {
        self.set_raw(key, &serde_json::to_string(value)?)
    }
}
