use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::{EvaluationKind, RepoInfo};

/// One row of evaluation history.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvaluation {
    pub id: i64,
    pub repo_full_name: String,
    pub kind: String,
    pub total_score: f64,
    pub level: String,
    pub report_json: String,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed repo cache and evaluation history. The connection sits
/// behind a mutex so one `Storage` can be shared across batch tasks.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Config("Storage connection lock poisoned".to_string()))
    }

    fn init_db(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS repo_cache (
                full_name TEXT PRIMARY KEY,
                payload_json TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS evaluations (
                id INTEGER PRIMARY KEY,
                repo_full_name TEXT NOT NULL,
                kind TEXT NOT NULL,
                total_score REAL NOT NULL,
                level TEXT NOT NULL,
                report_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_evaluations_repo_kind ON evaluations(repo_full_name, kind);
            "#,
        )?;

        Ok(())
    }

    /// Cached repository snapshot, or `None` if absent or older than `ttl_secs`.
    pub fn get_cached_repo(&self, full_name: &str, ttl_secs: u64) -> Result<Option<RepoInfo>> {
        let row: Option<(String, String)> = self
            .conn()?
            .query_row(
                "SELECT payload_json, fetched_at FROM repo_cache WHERE full_name = ?1",
                params![full_name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((payload, fetched_at)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| Error::ParseError(format!("Invalid cache timestamp: {}", e)))?;
        let age = Utc::now().signed_duration_since(fetched_at).num_seconds();
        if age < 0 || age as u64 >= ttl_secs {
            tracing::debug!("Cache entry for {} expired ({}s old)", full_name, age);
            return Ok(None);
        }

        match serde_json::from_str(&payload) {
            Ok(info) => Ok(Some(info)),
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry for {}: {}", full_name, e);
                Ok(None)
            }
        }
    }

    pub fn cache_repo(&self, info: &RepoInfo) -> Result<()> {
        self.cache_repo_at(info, Utc::now())
    }

    fn cache_repo_at(&self, info: &RepoInfo, fetched_at: DateTime<Utc>) -> Result<()> {
        let payload = serde_json::to_string(info)?;
        self.conn()?.execute(
            r#"
            INSERT INTO repo_cache (full_name, payload_json, fetched_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(full_name) DO UPDATE SET
                payload_json = excluded.payload_json,
                fetched_at = excluded.fetched_at
            "#,
            params![info.full_name, payload, fetched_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Removes every cached repository. Returns the number of entries removed.
    pub fn clear_cache(&self) -> Result<usize> {
        Ok(self.conn()?.execute("DELETE FROM repo_cache", [])?)
    }

    pub fn save_evaluation<T: Serialize>(
        &self,
        kind: EvaluationKind,
        full_name: &str,
        total_score: f64,
        level: &str,
        report: &T,
    ) -> Result<i64> {
        let report_json = serde_json::to_string(report)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO evaluations (repo_full_name, kind, total_score, level, report_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                full_name,
                kind.as_str(),
                total_score,
                level,
                report_json,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn latest_evaluation(
        &self,
        full_name: &str,
        kind: EvaluationKind,
    ) -> Result<Option<StoredEvaluation>> {
        let result = self.conn()?.query_row(
            r#"
            SELECT id, repo_full_name, kind, total_score, level, report_json, created_at
            FROM evaluations
            WHERE repo_full_name = ?1 AND kind = ?2
            ORDER BY id DESC
            LIMIT 1
            "#,
            params![full_name, kind.as_str()],
            row_to_evaluation,
        );

        match result {
            Ok(evaluation) => Ok(Some(evaluation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent evaluations first.
    pub fn list_evaluations(&self, limit: usize) -> Result<Vec<StoredEvaluation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, repo_full_name, kind, total_score, level, report_json, created_at
            FROM evaluations
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], row_to_evaluation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_evaluation(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredEvaluation> {
    let created_at: String = row.get(6)?;
    Ok(StoredEvaluation {
        id: row.get(0)?,
        repo_full_name: row.get(1)?,
        kind: row.get(2)?,
        total_score: row.get(3)?,
        level: row.get(4)?,
        report_json: row.get(5)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn repo(full_name: &str) -> RepoInfo {
        RepoInfo {
            full_name: full_name.to_string(),
            readme: "# Cached".to_string(),
            stars: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_roundtrip_and_ttl() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.get_cached_repo("acme/demo", 60).unwrap().is_none());

        storage.cache_repo(&repo("acme/demo")).unwrap();
        let cached = storage.get_cached_repo("acme/demo", 60).unwrap().unwrap();
        assert_eq!(cached.stars, 7);
        assert_eq!(cached.readme, "# Cached");

        storage
            .cache_repo_at(&repo("acme/old"), Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(storage.get_cached_repo("acme/old", 3600).unwrap().is_none());
        assert!(storage.get_cached_repo("acme/old", 3 * 3600).unwrap().is_some());
    }

    #[test]
    fn test_clear_cache() {
        let storage = Storage::in_memory().unwrap();
        storage.cache_repo(&repo("acme/a")).unwrap();
        storage.cache_repo(&repo("acme/b")).unwrap();
        assert_eq!(storage.clear_cache().unwrap(), 2);
        assert!(storage.get_cached_repo("acme/a", 60).unwrap().is_none());
    }

    #[test]
    fn test_evaluation_history() {
        let storage = Storage::in_memory().unwrap();
        let report = serde_json::json!({"total_score": 71.5});

        storage
            .save_evaluation(EvaluationKind::Innovation, "acme/demo", 64.0, "Moderate innovation", &report)
            .unwrap();
        storage
            .save_evaluation(EvaluationKind::Innovation, "acme/demo", 71.5, "Moderate innovation", &report)
            .unwrap();
        storage
            .save_evaluation(EvaluationKind::SocialValue, "acme/demo", 80.0, "Significant social value", &report)
            .unwrap();

        let latest = storage
            .latest_evaluation("acme/demo", EvaluationKind::Innovation)
            .unwrap()
            .unwrap();
        assert_eq!(latest.total_score, 71.5);
        assert_eq!(latest.kind, "innovation");

        assert!(storage
            .latest_evaluation("acme/other", EvaluationKind::Innovation)
            .unwrap()
            .is_none());

        let history = storage.list_evaluations(2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, "social_value");
    }
}
