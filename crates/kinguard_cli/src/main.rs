//! `kinguard` command line entry point.
//!
//! # Responsibility
//! - Load a JSON record graph and optional JSON classifier config.
//! - Run the classification service and print the report as JSON.
//! - Optionally persist the report to a SQLite database.

use clap::Parser;
use kinguard_core::db::{open_db, DbError};
use kinguard_core::{
    default_log_level, init_logging, ClassificationReport, ClassificationService,
    ClassifierConfig, ClassifyError, ConfigError, LoggingError, RecordGraph, ReportRepoError,
    ReportRepository, SqliteReportRepository,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kinguard")]
#[command(about = "Classify living people in a genealogy graph before publication", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON record graph (`{"people": {...}, "families": {...}}`)
    graph: PathBuf,

    /// JSON classifier config; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exclude branches entirely before this calendar year (1..=9999)
    #[arg(long)]
    cutoff_year: Option<i32>,

    /// Ancestor generations always printed above living people
    #[arg(long)]
    generations: Option<u32>,

    /// Pin the current year used for age thresholds
    #[arg(long)]
    current_year: Option<i32>,

    /// Keep "Living" placeholder names on people classified dead
    #[arg(long)]
    keep_living_names: bool,

    /// Absolute directory for rotating log files
    #[arg(long, env = "KINGUARD_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// SQLite database the report is saved to
    #[arg(long, env = "KINGUARD_DB")]
    db: Option<PathBuf>,

    /// Print summary counts instead of the full report
    #[arg(short, long)]
    summary: bool,
}

#[derive(Debug)]
enum CliError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Encode(serde_json::Error),
    Config(ConfigError),
    Logging(LoggingError),
    Classify(ClassifyError),
    Db(DbError),
    Repo(ReportRepoError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "cannot parse `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "cannot encode report: {err}"),
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Classify(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Classify(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<ClassifyError> for CliError {
    fn from(value: ClassifyError) -> Self {
        Self::Classify(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ReportRepoError> for CliError {
    fn from(value: ReportRepoError) -> Self {
        Self::Repo(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("kinguard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level: &str = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = load_config(cli)?;
    let mut graph: RecordGraph = read_json(&cli.graph)?;
    info!(
        "event=cli_run module=cli status=start people={} families={}",
        graph.person_count(),
        graph.family_count()
    );

    let report = ClassificationService::with_default_dates(config).run(&mut graph)?;

    if let Some(path) = cli.db.as_deref() {
        let conn = open_db(path)?;
        SqliteReportRepository::new(&conn).save_report(&report)?;
    }

    print_report(&report, cli.summary)
}

fn load_config(cli: &Cli) -> Result<ClassifierConfig, CliError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => read_json(path)?,
        None => ClassifierConfig::default(),
    };
    if let Some(year) = cli.cutoff_year {
        config = config.with_cutoff_year(year)?;
    }
    if let Some(generations) = cli.generations {
        config = config.with_ancestor_generations(generations);
    }
    if let Some(year) = cli.current_year {
        config = config.with_current_year(year);
    }
    if cli.keep_living_names {
        config.mask_unconfirmed_living_names = false;
    }
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn print_report(report: &ClassificationReport, summary_only: bool) -> Result<(), CliError> {
    let rendered = if summary_only {
        serde_json::to_string_pretty(&serde_json::json!({
            "run_id": report.run_id,
            "summary": report.summary,
        }))
    } else {
        serde_json::to_string_pretty(report)
    }
    .map_err(CliError::Encode)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config, Cli, CliError};
    use clap::Parser;
    use kinguard_core::ConfigError;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["kinguard", "graph.json"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cutoff_year_flag_sets_cutoff_day() {
        let config = load_config(&parse(&["--cutoff-year", "1800"])).unwrap();
        assert_eq!(config.cutoff_day, 1800 * 365);
    }

    #[test]
    fn out_of_range_cutoff_year_is_rejected() {
        let err = load_config(&parse(&["--cutoff-year", "2000000"])).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::CutoffYearOutOfRange(2_000_000))
        ));
    }

    #[test]
    fn cutoff_year_beyond_integer_range_fails_to_parse() {
        let result = Cli::try_parse_from([
            "kinguard",
            "graph.json",
            "--cutoff-year",
            "92233720368547758",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let config = load_config(&parse(&[
            "--generations",
            "2",
            "--current-year",
            "2020",
            "--keep-living-names",
        ]))
        .unwrap();
        assert_eq!(config.ancestor_generations, 2);
        assert_eq!(config.current_year, Some(2020));
        assert!(!config.mask_unconfirmed_living_names);
    }
}
