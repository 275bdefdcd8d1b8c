//! SQLite persistence for runs and the session event log.
//!
//! RULE: Only store.rs talks to the database.
//! Sessions never touch it; the runner drains session events and
//! appends them here.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    config::WheelConfig,
    error::{WheelError, WheelResult},
    event::{EventLogEntry, WheelEvent},
};

pub struct WheelStore {
    conn: Connection,
}

impl WheelStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> WheelResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL only matters for real files; memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> WheelResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> WheelResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: Option<u64>,
        version: &str,
        config: &WheelConfig,
    ) -> WheelResult<()> {
        let config_json = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, config_json, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                seed.map(|s| s as i64),
                version,
                config_json,
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    /// The config a run was started with.
    pub fn run_config(&self, run_id: &str) -> WheelResult<Option<WheelConfig>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT config_json FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> WheelResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, session_id, at_ms, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.session_id,
                entry.at_ms as i64,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    /// Append a batch of session events in one transaction.
    pub fn append_events(&self, run_id: &str, events: &[WheelEvent]) -> WheelResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for event in events {
            self.append_event(&EventLogEntry::from_event(run_id, event)?)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn events_for_session(
        &self,
        run_id: &str,
        session_id: &str,
    ) -> WheelResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, session_id, at_ms, event_type, payload
             FROM event_log WHERE run_id = ?1 AND session_id = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id, session_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    session_id: row.get(2)?,
                    at_ms:      row.get::<_, i64>(3)? as u64,
                    event_type: row.get(4)?,
                    payload:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Decoded events of one session, in log order.
    pub fn session_events(&self, run_id: &str, session_id: &str) -> WheelResult<Vec<WheelEvent>> {
        self.events_for_session(run_id, session_id)?
            .iter()
            .map(|e| serde_json::from_str::<WheelEvent>(&e.payload).map_err(WheelError::from))
            .collect()
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> WheelResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// (chosen_index, count) over every settled spin of a run.
    pub fn settled_counts(&self, run_id: &str) -> WheelResult<Vec<(usize, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT json_extract(payload, '$.chosen_index') AS idx, COUNT(*)
             FROM event_log
             WHERE run_id = ?1 AND event_type = 'spin_settled'
             GROUP BY idx ORDER BY idx ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, i64>(0)? as usize, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
