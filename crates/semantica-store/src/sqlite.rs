//! SQLite-backed storage

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use semantica_domain::{breadth_first_lineage, Metadata, ProvenanceEntry, ProvenanceStorage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const SELECT_COLUMNS: &str = "SELECT entity_id, entity_type, activity_id, agent_id, \
     source_document, source_location, source_quote, timestamp, first_seen, last_updated, \
     confidence, checksum, parent_entity_id, used_entities, start_index, end_index, \
     credibility, metadata, version FROM provenance_entries";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based implementation of `ProvenanceStorage`
///
/// Holds only the database path. Every operation opens its own connection,
/// works inside a transaction and closes the connection again, so no lock is
/// held between calls. Several instances (or processes) may point at the same
/// file; concurrent writers are serialized by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    path: PathBuf,
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `path`
    ///
    /// `:memory:` is rejected: each operation opens a fresh connection, which
    /// would see a fresh, empty in-memory database. Use `InMemoryStorage`
    /// instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use semantica_store::SqliteStorage;
    ///
    /// let storage = SqliteStorage::new("data/provenance.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || path.as_os_str() == ":memory:" {
            return Err(StoreError::InvalidPath(format!(
                "'{}' is not a database file path",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let storage = Self {
            path: path.to_path_buf(),
        };
        storage.initialize_schema()?;

        info!("Opened provenance database at {}", storage.path.display());
        Ok(storage)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn fetch(tx: &Transaction<'_>, entity_id: &str) -> Result<Option<ProvenanceEntry>, StoreError> {
        let sql = format!("{} WHERE entity_id = ?1", SELECT_COLUMNS);
        let entry = tx
            .query_row(&sql, params![entity_id], Self::row_to_entry)
            .optional()?;
        Ok(entry)
    }

    /// Decode one row; JSON columns failing to parse surface as conversion errors
    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<ProvenanceEntry> {
        let used_json: String = row.get(13)?;
        let used_entities: Vec<String> = serde_json::from_str(&used_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(13, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let metadata_json: String = row.get(17)?;
        let metadata: Metadata = serde_json::from_str(&metadata_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(17, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ProvenanceEntry {
            entity_id: row.get(0)?,
            entity_type: row.get(1)?,
            activity_id: row.get(2)?,
            agent_id: row.get(3)?,
            source_document: row.get(4)?,
            source_location: row.get(5)?,
            source_quote: row.get(6)?,
            timestamp: row.get(7)?,
            first_seen: row.get(8)?,
            last_updated: row.get(9)?,
            confidence: row.get(10)?,
            checksum: row.get(11)?,
            parent_entity_id: row.get(12)?,
            used_entities,
            start_index: row.get(14)?,
            end_index: row.get(15)?,
            credibility: row.get(16)?,
            metadata,
            version: row.get(18)?,
        })
    }
}

impl ProvenanceStorage for SqliteStorage {
    type Error = StoreError;

    fn store(&mut self, entry: &ProvenanceEntry) -> Result<(), Self::Error> {
        let used_entities = serde_json::to_string(&entry.used_entities)?;
        let metadata = serde_json::to_string(&entry.metadata)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO provenance_entries (entity_id, entity_type, activity_id, agent_id,
                 source_document, source_location, source_quote, timestamp, first_seen,
                 last_updated, confidence, checksum, parent_entity_id, used_entities,
                 start_index, end_index, credibility, metadata, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
             ON CONFLICT(entity_id) DO UPDATE SET
                 entity_type = excluded.entity_type,
                 activity_id = excluded.activity_id,
                 agent_id = excluded.agent_id,
                 source_document = excluded.source_document,
                 source_location = excluded.source_location,
                 source_quote = excluded.source_quote,
                 timestamp = excluded.timestamp,
                 first_seen = excluded.first_seen,
                 last_updated = excluded.last_updated,
                 confidence = excluded.confidence,
                 checksum = excluded.checksum,
                 parent_entity_id = excluded.parent_entity_id,
                 used_entities = excluded.used_entities,
                 start_index = excluded.start_index,
                 end_index = excluded.end_index,
                 credibility = excluded.credibility,
                 metadata = excluded.metadata,
                 version = excluded.version",
            params![
                &entry.entity_id,
                &entry.entity_type,
                &entry.activity_id,
                &entry.agent_id,
                &entry.source_document,
                &entry.source_location,
                &entry.source_quote,
                &entry.timestamp,
                &entry.first_seen,
                &entry.last_updated,
                entry.confidence,
                &entry.checksum,
                &entry.parent_entity_id,
                &used_entities,
                entry.start_index,
                entry.end_index,
                entry.credibility,
                &metadata,
                &entry.version,
            ],
        )?;
        tx.commit()?;

        debug!("Stored provenance entry {}", entry.entity_id);
        Ok(())
    }

    fn retrieve(&self, entity_id: &str) -> Result<Option<ProvenanceEntry>, Self::Error> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let entry = Self::fetch(&tx, entity_id)?;
        tx.commit()?;
        Ok(entry)
    }

    fn retrieve_all(
        &self,
        entity_type: Option<&str>,
    ) -> Result<Vec<ProvenanceEntry>, Self::Error> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let entries = {
            let mut sql = String::from(SELECT_COLUMNS);
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(entity_type) = entity_type {
                sql.push_str(" WHERE entity_type = ?");
                params.push(Box::new(entity_type.to_string()));
            }
            sql.push_str(" ORDER BY rowid");

            let mut stmt = tx.prepare(&sql)?;
            let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let rows = stmt
                .query_map(&param_refs[..], Self::row_to_entry)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        tx.commit()?;
        Ok(entries)
    }

    fn trace_lineage(&self, entity_id: &str) -> Result<Vec<ProvenanceEntry>, Self::Error> {
        // One connection for the whole walk rather than one per hop
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let lineage = breadth_first_lineage(entity_id, |id| Self::fetch(&tx, id))?;
        tx.commit()?;

        debug!("Traced {} lineage entries from {}", lineage.len(), entity_id);
        Ok(lineage)
    }

    fn clear(&mut self) -> Result<usize, Self::Error> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM provenance_entries", [])?;
        tx.commit()?;

        info!("Cleared {} provenance entries", removed);
        Ok(removed)
    }

    fn count(&self, entity_type: Option<&str>) -> Result<usize, Self::Error> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let count: i64 = match entity_type {
            Some(t) => tx.query_row(
                "SELECT COUNT(*) FROM provenance_entries WHERE entity_type = ?1",
                params![t],
                |row| row.get(0),
            )?,
            None => tx.query_row("SELECT COUNT(*) FROM provenance_entries", [], |row| {
                row.get(0)
            })?,
        };
        tx.commit()?;
        Ok(count as usize)
    }
}
