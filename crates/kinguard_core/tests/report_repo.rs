use kinguard_core::db::open_db_in_memory;
use kinguard_core::db::open_db;
use kinguard_core::{
    ClassificationReport, ClassificationService, ClassifierConfig, EventFact, EventType, Family,
    Person, PersonId, RecordGraph, ReportRepoError, ReportRepository, SqliteReportRepository,
    VitalStatus,
};
use uuid::Uuid;

fn classified_report() -> ClassificationReport {
    let mut graph = RecordGraph::new();
    let mut child = Person::new("I1").with_event(EventFact::dated(EventType::Birth, "1990"));
    child.add_child_of_family("F1", true, None);
    let mut father = Person::new("I2").with_event(EventFact::dated(EventType::Death, "1970"));
    father.add_spouse_of_family("F1");
    graph.insert_person(child);
    graph.insert_person(father);
    graph.insert_family(
        Family::new("F1")
            .with_husband("I2")
            .with_wife("I404")
            .with_child("I1"),
    );

    let config = ClassifierConfig::default()
        .with_current_year(2020)
        .with_ancestor_generations(2);
    ClassificationService::with_default_dates(config)
        .run(&mut graph)
        .unwrap()
}

#[test]
fn save_and_load_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let report = classified_report();

    repo.save_report(&report).unwrap();

    let people = repo.load_person_outcomes(report.run_id).unwrap();
    assert_eq!(people, report.people);
    let families = repo.load_family_outcomes(report.run_id).unwrap();
    assert_eq!(families, report.families);

    let father = people
        .iter()
        .find(|row| row.id == PersonId::new("I2"))
        .unwrap();
    assert_eq!(father.vital_status, VitalStatus::Dead);
    assert!(father.always_print);
}

#[test]
fn list_runs_reports_summary_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let report = classified_report();
    repo.save_report(&report).unwrap();

    let runs = repo.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.run_id, report.run_id);
    assert_eq!(run.current_year, 2020);
    assert_eq!(run.person_count, 2);
    assert_eq!(run.living_count, 1);
    assert_eq!(run.dead_count, 1);
    assert_eq!(run.warning_count, 1);
    assert!(run.created_at > 0);
}

#[test]
fn dangling_references_are_stored_with_the_run() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let report = classified_report();
    repo.save_report(&report).unwrap();

    let stored: Vec<(String, String)> = conn
        .prepare("SELECT origin, reference FROM dangling_references WHERE run_id = ?1;")
        .unwrap()
        .query_map([report.run_id.to_string()], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        stored,
        vec![("family:F1".to_string(), "spouse:I404".to_string())]
    );
}

#[test]
fn saving_same_run_twice_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let report = classified_report();
    repo.save_report(&report).unwrap();

    let err = repo.save_report(&report).unwrap_err();
    assert!(matches!(err, ReportRepoError::DuplicateRun(id) if id == report.run_id));
    assert_eq!(repo.list_runs().unwrap().len(), 1);
}

#[test]
fn loading_unknown_run_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let missing = Uuid::new_v4();

    let err = repo.load_person_outcomes(missing).unwrap_err();
    assert!(matches!(err, ReportRepoError::RunNotFound(id) if id == missing));
    let err = repo.load_family_outcomes(missing).unwrap_err();
    assert!(matches!(err, ReportRepoError::RunNotFound(_)));
}

#[test]
fn invalid_persisted_status_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::new(&conn);
    let report = classified_report();
    repo.save_report(&report).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE person_outcomes SET vital_status = 'ghost' WHERE run_id = ?1;",
        [report.run_id.to_string()],
    )
    .unwrap();

    let err = repo.load_person_outcomes(report.run_id).unwrap_err();
    assert!(matches!(err, ReportRepoError::InvalidData(_)));
}

#[test]
fn reports_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.db");
    let report = classified_report();

    {
        let conn = open_db(&path).unwrap();
        SqliteReportRepository::new(&conn)
            .save_report(&report)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteReportRepository::new(&conn);
    assert_eq!(repo.load_person_outcomes(report.run_id).unwrap(), report.people);
}
