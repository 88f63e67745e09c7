//! Classification report repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist one report per run: run header, person and family outcomes,
//!   dangling-reference warnings.
//! - Read outcomes back for renderers and audits.
//!
//! # Invariants
//! - A run is written in one transaction; partial runs are never visible.
//! - Run ids are unique; saving the same run twice is rejected.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::family::FamilyId;
use crate::model::person::{PersonId, VitalStatus};
use crate::report::{ClassificationReport, FamilyOutcome, PersonOutcome};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ReportRepoResult<T> = Result<T, ReportRepoError>;

#[derive(Debug)]
pub enum ReportRepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    DuplicateRun(Uuid),
    RunNotFound(Uuid),
    InvalidData(String),
}

impl Display for ReportRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode report config: {err}"),
            Self::DuplicateRun(id) => write!(f, "classification run already stored: {id}"),
            Self::RunNotFound(id) => write!(f, "classification run not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted report data: {message}"),
        }
    }
}

impl Error for ReportRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::DuplicateRun(_) | Self::RunNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ReportRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ReportRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for ReportRepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Header row of one stored run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Epoch milliseconds at save time.
    pub created_at: i64,
    pub current_year: i64,
    pub person_count: usize,
    pub living_count: usize,
    pub dead_count: usize,
    pub printed_count: usize,
    pub warning_count: usize,
}

/// Repository interface for classification reports.
pub trait ReportRepository {
    fn save_report(&self, report: &ClassificationReport) -> ReportRepoResult<()>;
    /// Person outcomes of `run_id` in the report's row order.
    fn load_person_outcomes(&self, run_id: Uuid) -> ReportRepoResult<Vec<PersonOutcome>>;
    fn load_family_outcomes(&self, run_id: Uuid) -> ReportRepoResult<Vec<FamilyOutcome>>;
    /// Stored runs, newest first.
    fn list_runs(&self) -> ReportRepoResult<Vec<RunSummary>>;
}

/// SQLite-backed report repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn run_exists(&self, run_id: Uuid) -> ReportRepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM classification_runs WHERE run_id = ?1;",
                [run_id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn save_report(&self, report: &ClassificationReport) -> ReportRepoResult<()> {
        if self.run_exists(report.run_id)? {
            return Err(ReportRepoError::DuplicateRun(report.run_id));
        }
        let run_id = report.run_id.to_string();
        let config_json = serde_json::to_string(&report.config)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO classification_runs (
                run_id,
                created_at,
                current_year,
                config_json,
                person_count,
                living_count,
                dead_count,
                printed_count,
                warning_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                run_id,
                chrono::Utc::now().timestamp_millis(),
                report.current_year,
                config_json,
                count_to_db(report.summary.people),
                count_to_db(report.summary.living),
                count_to_db(report.summary.dead),
                count_to_db(report.summary.printed),
                count_to_db(report.summary.warnings),
            ],
        )?;

        {
            let mut insert_person = tx.prepare(
                "INSERT INTO person_outcomes (
                    run_id,
                    position,
                    person_id,
                    title,
                    vital_status,
                    born_before_cutoff,
                    before_cutoff,
                    included,
                    always_print,
                    should_print
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            )?;
            for (position, row) in report.people.iter().enumerate() {
                insert_person.execute(params![
                    run_id,
                    count_to_db(position),
                    row.id.as_str(),
                    row.title.as_str(),
                    row.vital_status.as_str(),
                    bool_to_int(row.born_before_cutoff),
                    bool_to_int(row.before_cutoff),
                    bool_to_int(row.included),
                    bool_to_int(row.always_print),
                    bool_to_int(row.should_print),
                ])?;
            }

            let mut insert_family = tx.prepare(
                "INSERT INTO family_outcomes (run_id, family_id, before_cutoff, always_print)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for row in &report.families {
                insert_family.execute(params![
                    run_id,
                    row.id.as_str(),
                    bool_to_int(row.before_cutoff),
                    bool_to_int(row.always_print),
                ])?;
            }

            let mut insert_warning = tx.prepare(
                "INSERT INTO dangling_references (run_id, origin, reference)
                 VALUES (?1, ?2, ?3);",
            )?;
            for warning in &report.warnings {
                insert_warning.execute(params![
                    run_id,
                    warning.origin.to_string(),
                    warning.reference.to_string(),
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=report_save module=repo status=ok run_id={} people={} families={} warnings={}",
            run_id,
            report.people.len(),
            report.families.len(),
            report.warnings.len()
        );
        Ok(())
    }

    fn load_person_outcomes(&self, run_id: Uuid) -> ReportRepoResult<Vec<PersonOutcome>> {
        if !self.run_exists(run_id)? {
            return Err(ReportRepoError::RunNotFound(run_id));
        }
        let mut stmt = self.conn.prepare(
            "SELECT
                person_id,
                title,
                vital_status,
                born_before_cutoff,
                before_cutoff,
                included,
                always_print,
                should_print
            FROM person_outcomes
            WHERE run_id = ?1
            ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([run_id.to_string()])?;
        let mut outcomes = Vec::new();
        while let Some(row) = rows.next()? {
            outcomes.push(parse_person_row(row)?);
        }
        Ok(outcomes)
    }

    fn load_family_outcomes(&self, run_id: Uuid) -> ReportRepoResult<Vec<FamilyOutcome>> {
        if !self.run_exists(run_id)? {
            return Err(ReportRepoError::RunNotFound(run_id));
        }
        let mut stmt = self.conn.prepare(
            "SELECT family_id, before_cutoff, always_print
            FROM family_outcomes
            WHERE run_id = ?1
            ORDER BY family_id ASC;",
        )?;
        let mut rows = stmt.query([run_id.to_string()])?;
        let mut outcomes = Vec::new();
        while let Some(row) = rows.next()? {
            outcomes.push(FamilyOutcome {
                id: FamilyId::new(row.get::<_, String>("family_id")?),
                before_cutoff: parse_flag(row, "before_cutoff")?,
                always_print: parse_flag(row, "always_print")?,
            });
        }
        Ok(outcomes)
    }

    fn list_runs(&self) -> ReportRepoResult<Vec<RunSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                run_id,
                created_at,
                current_year,
                person_count,
                living_count,
                dead_count,
                printed_count,
                warning_count
            FROM classification_runs
            ORDER BY created_at DESC, run_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut runs = Vec::new();
        while let Some(row) = rows.next()? {
            runs.push(parse_run_row(row)?);
        }
        Ok(runs)
    }
}

fn parse_person_row(row: &Row<'_>) -> ReportRepoResult<PersonOutcome> {
    let status_text: String = row.get("vital_status")?;
    let vital_status = parse_vital_status(&status_text).ok_or_else(|| {
        ReportRepoError::InvalidData(format!(
            "invalid vital status `{status_text}` in person_outcomes.vital_status"
        ))
    })?;

    Ok(PersonOutcome {
        id: PersonId::new(row.get::<_, String>("person_id")?),
        title: row.get("title")?,
        vital_status,
        born_before_cutoff: parse_flag(row, "born_before_cutoff")?,
        before_cutoff: parse_flag(row, "before_cutoff")?,
        included: parse_flag(row, "included")?,
        always_print: parse_flag(row, "always_print")?,
        should_print: parse_flag(row, "should_print")?,
    })
}

fn parse_run_row(row: &Row<'_>) -> ReportRepoResult<RunSummary> {
    let id_text: String = row.get("run_id")?;
    let run_id = Uuid::parse_str(&id_text).map_err(|_| {
        ReportRepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in classification_runs.run_id"
        ))
    })?;
    Ok(RunSummary {
        run_id,
        created_at: row.get("created_at")?,
        current_year: row.get("current_year")?,
        person_count: parse_count(row, "person_count")?,
        living_count: parse_count(row, "living_count")?,
        dead_count: parse_count(row, "dead_count")?,
        printed_count: parse_count(row, "printed_count")?,
        warning_count: parse_count(row, "warning_count")?,
    })
}

fn parse_vital_status(value: &str) -> Option<VitalStatus> {
    match value {
        "living" => Some(VitalStatus::Living),
        "dead" => Some(VitalStatus::Dead),
        "unknown" => Some(VitalStatus::Unknown),
        _ => None,
    }
}

fn parse_flag(row: &Row<'_>, column: &str) -> ReportRepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ReportRepoError::InvalidData(format!(
            "invalid flag value `{other}` in column {column}"
        ))),
    }
}

fn parse_count(row: &Row<'_>, column: &str) -> ReportRepoResult<usize> {
    let value: i64 = row.get(column)?;
    usize::try_from(value).map_err(|_| {
        ReportRepoError::InvalidData(format!("invalid count `{value}` in column {column}"))
    })
}

fn count_to_db(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
