//! Schema steps for the key-value store database.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - `PRAGMA user_version` equals the last step applied to the file.
//! - Pending steps run in one transaction; a failed step leaves the file
//!   at its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One schema step, identified by the version it brings the file to.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_init.sql"),
}];

/// Outcome of bringing one connection up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationReport {
    /// Number of schema steps run by this call.
    pub fn applied(&self) -> u32 {
        self.to_version - self.from_version
    }
}

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs every schema step newer than the file's recorded version.
///
/// Files written by a newer build are refused with
/// [`DbError::UnsupportedSchemaVersion`] and left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = schema_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let report = MigrationReport {
        from_version,
        to_version,
    };
    if report.applied() == 0 {
        debug!("event=db_migrate module=db status=skipped version={from_version}");
        return Ok(report);
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        report.from_version,
        report.to_version,
        report.applied()
    );
    Ok(report)
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    // PRAGMA does not accept bound parameters.
    tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version, MigrationReport, SCHEMA_STEPS};
    use rusqlite::Connection;

    #[test]
    fn step_versions_are_contiguous_from_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
        assert_eq!(latest_version(), SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn fresh_database_runs_every_step_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        let report = apply_migrations(&mut conn).unwrap();
        assert_eq!(
            report,
            MigrationReport {
                from_version: 0,
                to_version: latest_version(),
            }
        );
        assert_eq!(report.applied(), latest_version());
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        let again = apply_migrations(&mut conn).unwrap();
        assert_eq!(again.applied(), 0);
    }

    #[test]
    fn newer_file_is_refused_without_changes() {
        let mut conn = Connection::open_in_memory().unwrap();
        let newer = latest_version() + 1;
        conn.execute_batch(&format!("PRAGMA user_version = {newer};"))
            .unwrap();

        assert!(apply_migrations(&mut conn).is_err());
        assert_eq!(schema_version(&conn).unwrap(), newer);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }
}
