//! Persistent engine backed by a single redb table in a temporary file.
//!
//! Every registration writes into the same `redirects` table inside one
//! write transaction, so a later source overwrites earlier values for the
//! same path. Lookups open a read transaction and never observe a
//! partially committed registration.
//!
//! The table file lives only as long as the engine: [`Engine::release`]
//! closes the database and deletes it, and dropping the engine without
//! releasing it deletes it as well.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tempfile::TempPath;

use super::{log_registration, Engine};
use crate::error::UrlshortError;
use crate::mapping::MappingSet;

const REDIRECTS: TableDefinition<&str, &str> = TableDefinition::new("redirects");

pub struct PersistentEngine {
    db: Database,
    file: TempPath,
}

impl std::fmt::Debug for PersistentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentEngine")
            .field("file", &self.path())
            .finish_non_exhaustive()
    }
}

impl PersistentEngine {
    /// Create a fresh table file named `urlshort-*.redb` inside `dir`.
    pub fn create_in(dir: &Path) -> Result<Self, UrlshortError> {
        let file = tempfile::Builder::new()
            .prefix("urlshort-")
            .suffix(".redb")
            .tempfile_in(dir)?
            .into_temp_path();

        let db = Database::create(&file).map_err(|e| UrlshortError::storage("open", e))?;

        // Create the table up front so lookups before the first
        // registration see an empty table rather than a missing one.
        let txn = db
            .begin_write()
            .map_err(|e| UrlshortError::storage("begin write", e))?;
        txn.open_table(REDIRECTS)
            .map_err(|e| UrlshortError::storage("create table", e))?;
        txn.commit()
            .map_err(|e| UrlshortError::storage("commit", e))?;

        tracing::debug!(path = %file.display(), "persistent engine created");
        Ok(Self { db, file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Write every mapping in one transaction. Nothing is visible to
    /// readers until the commit succeeds.
    pub fn store(&self, mappings: &MappingSet) -> Result<(), UrlshortError> {
        log_registration("persistent", mappings);
        let txn = self
            .db
            .begin_write()
            .map_err(|e| UrlshortError::storage("begin write", e))?;
        {
            let mut table = txn
                .open_table(REDIRECTS)
                .map_err(|e| UrlshortError::storage("open table", e))?;
            for (path, url) in mappings.iter() {
                table
                    .insert(path, url)
                    .map_err(|e| UrlshortError::storage("insert", e))?;
            }
        }
        // An uncommitted WriteTransaction aborts on drop, so any early
        // return above leaves the table untouched.
        txn.commit()
            .map_err(|e| UrlshortError::storage("commit", e))
    }

    pub fn lookup(&self, path: &str) -> Result<Option<String>, UrlshortError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| UrlshortError::storage("begin read", e))?;
        let table = txn
            .open_table(REDIRECTS)
            .map_err(|e| UrlshortError::storage("open table", e))?;
        let url = table
            .get(path)
            .map_err(|e| UrlshortError::storage("get", e))?;
        Ok(url.map(|guard| guard.value().to_string()))
    }

    /// Number of stored paths.
    pub fn len(&self) -> Result<u64, UrlshortError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| UrlshortError::storage("begin read", e))?;
        let table = txn
            .open_table(REDIRECTS)
            .map_err(|e| UrlshortError::storage("open table", e))?;
        table.len().map_err(|e| UrlshortError::storage("len", e))
    }

    pub fn is_empty(&self) -> Result<bool, UrlshortError> {
        Ok(self.len()? == 0)
    }

    /// Close the database and delete its file, returning the deleted path.
    pub fn close(self) -> Result<PathBuf, UrlshortError> {
        let Self { db, file } = self;
        drop(db);
        let path = file.to_path_buf();
        file.close()?;
        tracing::info!(path = %path.display(), "persistent engine released");
        Ok(path)
    }
}

impl Engine for PersistentEngine {
    fn name(&self) -> &'static str {
        "persistent"
    }

    fn register(self: Box<Self>, mappings: MappingSet) -> Result<Box<dyn Engine>, UrlshortError> {
        self.store(&mappings)?;
        Ok(self)
    }

    fn route(&self, path: &str) -> Result<Option<String>, UrlshortError> {
        self.lookup(path)
    }

    fn release(self: Box<Self>) -> Result<(), UrlshortError> {
        self.close().map(|_| ())
    }
}
