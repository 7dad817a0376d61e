//! SQLite-backed [`Store`].
//!
//! Three tables: `interactions`, `knowledge` (unique `topic`), and
//! `personality` (one row per trait). Timestamps are RFC 3339 UTC strings
//! with microsecond precision, so lexical order equals time order; row ids
//! break ties between rows written in the same microsecond.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::knowledge::entry::{CONFIDENCE_STEP, CONTENT_SEPARATOR, INITIAL_CONFIDENCE};
use crate::knowledge::KnowledgeEntry;
use crate::memory::interaction::{Feedback, Interaction};
use crate::memory::storage::interface::Store;
use crate::utilities::errors::StoreError;

const UPSERT_KNOWLEDGE_SQL: &str = "INSERT INTO knowledge (topic, content, confidence, timestamp)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(topic) DO UPDATE SET
         content = content || ?5 || excluded.content,
         confidence = MIN(confidence + ?6, 1.0),
         timestamp = excluded.timestamp";

const UPSERT_TRAIT_SQL: &str = "INSERT INTO personality (trait, value) VALUES (?1, ?2)
     ON CONFLICT(trait) DO UPDATE SET value = excluded.value";

/// SQLite store guarded by a mutex so it can be shared across threads.
#[derive(Debug)]
pub struct SQLiteStore {
    /// Database file, or `None` for an in-memory database.
    pub db_path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SQLiteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            log::error!("Failed to open SQLite database at '{}': {}", path.display(), e);
            e
        })?;
        let store = Self {
            db_path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        };
        store.init_db()?;
        Ok(store)
    }

    /// A private, non-persistent database. Useful for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            db_path: None,
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                response TEXT NOT NULL,
                feedback TEXT,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_interactions_timestamp
                ON interactions(timestamp);
            CREATE TABLE IF NOT EXISTS knowledge (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic TEXT UNIQUE NOT NULL,
                content TEXT NOT NULL,
                confidence REAL NOT NULL DEFAULT 0.5,
                timestamp TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS personality (
                trait TEXT PRIMARY KEY,
                value REAL NOT NULL
            );",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|e| StoreError::ConnectionError {
            message: format!("Failed to acquire database lock: {e}"),
        })
    }
}

fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(table: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRow {
            table,
            message: format!("bad timestamp {raw:?}: {e}"),
        })
}

type RawInteraction = (i64, String, String, Option<String>, String);

fn read_interaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInteraction> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode_interaction(raw: RawInteraction) -> Result<Interaction, StoreError> {
    let (id, query, response, feedback, timestamp) = raw;
    let feedback = match feedback {
        Some(value) => Some(value.parse::<Feedback>().map_err(|_| StoreError::CorruptRow {
            table: "interactions",
            message: format!("unknown feedback {value:?} on row {id}"),
        })?),
        None => None,
    };
    Ok(Interaction {
        id,
        query,
        response,
        feedback,
        timestamp: parse_timestamp("interactions", &timestamp)?,
    })
}

fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<usize, StoreError> {
    let n: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(n as usize)
}

impl Store for SQLiteStore {
    fn get_trait(&self, name: &str) -> Result<Option<f64>, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM personality WHERE trait = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_trait(&self, name: &str, value: f64) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(UPSERT_TRAIT_SQL, params![name, value])?;
        Ok(())
    }

    fn set_traits(&self, traits: &[(&str, f64)]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for (name, value) in traits {
            tx.execute(UPSERT_TRAIT_SQL, params![name, value])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn list_traits(&self) -> Result<BTreeMap<String, f64>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT trait, value FROM personality")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;
        let mut traits = BTreeMap::new();
        for row in rows {
            let (name, value) = row?;
            traits.insert(name, value);
        }
        Ok(traits)
    }

    fn insert_interaction(
        &self,
        query: &str,
        response: &str,
        feedback: Option<Feedback>,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO interactions (query, response, feedback, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![query, response, feedback.map(|f| f.as_str()), now_string()],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("SQLiteStore::insert_interaction: id={}", id);
        Ok(id)
    }

    fn get_interaction(&self, id: i64) -> Result<Option<Interaction>, StoreError> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                "SELECT id, query, response, feedback, timestamp
                 FROM interactions WHERE id = ?1",
                params![id],
                read_interaction,
            )
            .optional()?;
        raw.map(decode_interaction).transpose()
    }

    fn set_interaction_feedback(&self, id: i64, feedback: Feedback) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE interactions SET feedback = ?1 WHERE id = ?2",
            params![feedback.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    fn list_recent_interactions(&self, limit: usize) -> Result<Vec<Interaction>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, query, response, feedback, timestamp
             FROM interactions
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], read_interaction)?;
        let mut interactions = Vec::new();
        for row in rows {
            interactions.push(decode_interaction(row?)?);
        }
        Ok(interactions)
    }

    fn delete_interactions_except_recent(&self, keep: usize) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM interactions
             WHERE id NOT IN (
                 SELECT id FROM interactions
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1
             )",
            params![keep as i64],
        )?;
        Ok(deleted)
    }

    fn count_interactions(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        count(&conn, "SELECT COUNT(*) FROM interactions", [])
    }

    fn count_interactions_with_feedback(&self, feedback: Feedback) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        count(
            &conn,
            "SELECT COUNT(*) FROM interactions WHERE feedback = ?1",
            params![feedback.as_str()],
        )
    }

    fn upsert_knowledge(&self, topic: &str, content: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            UPSERT_KNOWLEDGE_SQL,
            params![
                topic,
                content,
                INITIAL_CONFIDENCE,
                now_string(),
                CONTENT_SEPARATOR,
                CONFIDENCE_STEP
            ],
        )?;
        Ok(())
    }

    fn upsert_knowledge_batch(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = now_string();
        for (topic, content) in entries {
            tx.execute(
                UPSERT_KNOWLEDGE_SQL,
                params![
                    topic,
                    content,
                    INITIAL_CONFIDENCE,
                    now,
                    CONTENT_SEPARATOR,
                    CONFIDENCE_STEP
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn record_learning(
        &self,
        knowledge: &[(&str, &str)],
        traits: &[(&str, f64)],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = now_string();
        for (topic, content) in knowledge {
            tx.execute(
                UPSERT_KNOWLEDGE_SQL,
                params![
                    topic,
                    content,
                    INITIAL_CONFIDENCE,
                    now,
                    CONTENT_SEPARATOR,
                    CONFIDENCE_STEP
                ],
            )?;
        }
        for (name, value) in traits {
            tx.execute(UPSERT_TRAIT_SQL, params![name, value])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn list_knowledge(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT topic, content, confidence, timestamp FROM knowledge ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        let mut entries = Vec::new();
        for row in rows {
            let (topic, content, confidence, timestamp) = row?;
            entries.push(KnowledgeEntry {
                topic,
                content,
                confidence,
                timestamp: parse_timestamp("knowledge", &timestamp)?,
            });
        }
        Ok(entries)
    }

    fn count_knowledge(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        count(&conn, "SELECT COUNT(*) FROM knowledge", [])
    }
}
