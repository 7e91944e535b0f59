//! The complaint store: a single SQLite table owning all durable state.
//!
//! `ComplaintStore` is injected into handlers as `web::Data<ComplaintStore>`
//! and opens one connection per operation, so each insert or update is a
//! single atomic statement and nothing is shared across requests. Rows are
//! created by the intake endpoint, mutated (status only) by the status
//! endpoint, listed by the three query surfaces, and never deleted.

use crate::error::AppError;
use common::model::complaint::{Complaint, Status};
use rusqlite::{params, Connection};
use std::path::PathBuf;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS complaints (
    complaint_id TEXT PRIMARY KEY,
    vehicle_no TEXT NOT NULL,
    violation_type TEXT,
    location TEXT,
    latitude REAL,
    longitude REAL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    state TEXT,
    comment TEXT,
    file_path TEXT,
    status TEXT NOT NULL DEFAULT 'open'
)";

#[derive(Clone)]
pub struct ComplaintStore {
    db_path: PathBuf,
}

impl ComplaintStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        ComplaintStore {
            db_path: db_path.into(),
        }
    }

    /// One connection per operation: acquired here, released when the
    /// calling method returns.
    fn connection(&self) -> Result<Connection, AppError> {
        Connection::open(&self.db_path).map_err(AppError::from)
    }

    /// Creates the `complaints` table. Run once at startup.
    pub fn init_schema(&self) -> Result<(), AppError> {
        self.connection()?.execute(SCHEMA, [])?;
        Ok(())
    }

    /// Persists one complaint. A constraint violation or I/O failure leaves
    /// no partial row behind; the single statement either lands or doesn't.
    pub fn insert(&self, complaint: &Complaint) -> Result<(), AppError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO complaints (complaint_id, vehicle_no, violation_type, location, \
             latitude, longitude, date, time, state, comment, file_path, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                complaint.complaint_id,
                complaint.vehicle_no,
                complaint.violation_type,
                complaint.location,
                complaint.latitude,
                complaint.longitude,
                complaint.date,
                complaint.time,
                complaint.state,
                complaint.comment,
                complaint.file_path,
                complaint.status.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Replaces the status of one complaint, returning the applied value.
    /// Zero affected rows means the id does not exist.
    pub fn update_status(&self, complaint_id: &str, status: Status) -> Result<Status, AppError> {
        let conn = self.connection()?;
        let affected = conn.execute(
            "UPDATE complaints SET status = ?1 WHERE complaint_id = ?2",
            params![status.as_str(), complaint_id],
        )?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "Complaint with ID {} not found.",
                complaint_id
            )));
        }
        Ok(status)
    }

    /// Every complaint, newest-created-first.
    pub fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT complaint_id, vehicle_no, violation_type, location, latitude, longitude, \
             date, time, state, comment, file_path, status \
             FROM complaints ORDER BY rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            let status: String = row.get(11)?;
            Ok(Complaint {
                complaint_id: row.get(0)?,
                vehicle_no: row.get(1)?,
                violation_type: row.get(2)?,
                location: row.get(3)?,
                latitude: row.get(4)?,
                longitude: row.get(5)?,
                date: row.get(6)?,
                time: row.get(7)?,
                state: row.get(8)?,
                comment: row.get(9)?,
                file_path: row.get(10)?,
                status: Status::parse(&status).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        11,
                        rusqlite::types::Type::Text,
                        format!("unknown status '{}'", status).into(),
                    )
                })?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> ComplaintStore {
        let store = ComplaintStore::new(dir.join("complaints.db"));
        store.init_schema().unwrap();
        store
    }

    fn complaint(id: &str) -> Complaint {
        Complaint {
            complaint_id: id.to_string(),
            vehicle_no: "KA01AB1234".to_string(),
            violation_type: Some("Signal jump".to_string()),
            location: Some("MG Road".to_string()),
            latitude: Some(12.97),
            longitude: Some(77.59),
            date: "05-03-2024".to_string(),
            time: "14:30".to_string(),
            state: Some("Karnataka".to_string()),
            comment: None,
            file_path: None,
            status: Status::Open,
        }
    }

    #[test]
    fn insert_then_list_round_trips_the_row() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.insert(&complaint("c-1")).unwrap();

        let rows = store.list_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].complaint_id, "c-1");
        assert_eq!(rows[0].vehicle_no, "KA01AB1234");
        assert_eq!(rows[0].status, Status::Open);
        assert_eq!(rows[0].latitude, Some(12.97));
        assert_eq!(rows[0].comment, None);
    }

    #[test]
    fn list_is_newest_first() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.insert(&complaint("first")).unwrap();
        store.insert(&complaint("second")).unwrap();
        store.insert(&complaint("third")).unwrap();

        let ids: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|c| c.complaint_id)
            .collect();
        assert_eq!(ids, ["third", "second", "first"]);
    }

    #[test]
    fn duplicate_id_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.insert(&complaint("dup")).unwrap();
        let err = store.insert(&complaint("dup")).unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn update_status_replaces_and_returns_the_value() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.insert(&complaint("c-1")).unwrap();
        let applied = store.update_status("c-1", Status::Completed).unwrap();
        assert_eq!(applied, Status::Completed);
        assert_eq!(store.list_all().unwrap()[0].status, Status::Completed);
    }

    #[test]
    fn update_status_of_missing_id_is_not_found_and_changes_nothing() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        store.insert(&complaint("c-1")).unwrap();
        let err = store.update_status("no-such-id", Status::Hold).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.list_all().unwrap()[0].status, Status::Open);
    }
}
