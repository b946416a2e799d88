use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use exam_seating::access::{RequestContext, Role, UnknownRole};
use exam_seating::config::{AppConfig, ConfigError};
use exam_seating::error::AllocationError;
use exam_seating::import::{ImportError, RoomImporter, RosterImporter};
use exam_seating::kpi::PlanKpi;
use exam_seating::ledger::PlanLedger;
use exam_seating::materialize;
use exam_seating::models::{AdjacencyPolicy, ConflictRule};
use exam_seating::notify::{self, ExamDetails};
use exam_seating::pool::CandidatePoolBuilder;
use exam_seating::solver::SeatingSolver;
use exam_seating::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "exam-seating",
    about = "Allocate exam seats so that no two adjacent candidates conflict",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate seats for one session and print the plan
    Allocate(AllocateArgs),
    /// Check a session's roster without allocating
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct AllocateArgs {
    /// Roster CSV (student_id,name,email,section,gender,session)
    #[arg(long)]
    roster: PathBuf,
    /// Room CSV (room_id,name,rows,columns)
    #[arg(long)]
    rooms: PathBuf,
    /// Exam session to allocate
    #[arg(long)]
    session: String,
    /// Caller role (student, faculty, admin)
    #[arg(long, default_value = "admin", value_parser = parse_role)]
    role: Role,
    /// Caller ID recorded in logs
    #[arg(long, default_value = "cli")]
    actor: String,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Grid)]
    format: OutputFormat,
    /// Override the configured adjacency policy (orthogonal, diagonal)
    #[arg(long, value_parser = parse_adjacency)]
    adjacency: Option<AdjacencyPolicy>,
    /// Override the configured conflict rule
    #[arg(long, value_parser = parse_conflict_rule)]
    conflict_rule: Option<ConflictRule>,
    /// Seeded roster shuffle
    #[arg(long)]
    seed: Option<u64>,
    /// Print plan metrics after the plan
    #[arg(long)]
    kpi: bool,
    /// Minimum mixed-section share of adjacent pairs before warning
    #[arg(long, default_value_t = 0.0)]
    min_section_mix: f64,
    #[command(flatten)]
    notify: NotifyArgs,
}

#[derive(Args, Debug)]
struct NotifyArgs {
    /// Write per-candidate notifications as JSON to this path
    #[arg(long, requires_all = ["exam_name", "exam_date", "exam_time"])]
    notifications: Option<PathBuf>,
    /// Exam name shown in notifications
    #[arg(long)]
    exam_name: Option<String>,
    /// Exam date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    exam_date: Option<NaiveDate>,
    /// Exam start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    exam_time: Option<NaiveTime>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Roster CSV
    #[arg(long)]
    roster: PathBuf,
    /// Exam session to check
    #[arg(long)]
    session: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Grid,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("failed to encode output: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Allocate(args) => run_allocate(config, args),
        Command::Validate(args) => run_validate(args),
    }
}

fn run_allocate(config: AppConfig, args: AllocateArgs) -> Result<(), AppError> {
    let mut solver_config = config.solver;
    if let Some(adjacency) = args.adjacency {
        solver_config.adjacency = adjacency;
    }
    if let Some(rule) = args.conflict_rule {
        solver_config.conflict_rule = rule;
    }
    if let Some(seed) = args.seed {
        solver_config.shuffle_seed = Some(seed);
    }

    let roster = RosterImporter::from_path(&args.roster)?;
    let rooms = RoomImporter::from_path(&args.rooms)?;
    let candidates = CandidatePoolBuilder::new(&args.session).build(&roster)?;

    let ctx = RequestContext::new(args.actor, args.role);
    let plan = SeatingSolver::with_config(solver_config).allocate(
        &ctx,
        &args.session,
        &candidates,
        &rooms,
    )?;
    let plan = PlanLedger::new().publish(&ctx, plan)?;
    info!(session = plan.session_id(), version = plan.version(), "plan ready");

    let records = materialize::records(&plan);
    match args.format {
        OutputFormat::Json => println!("{}", materialize::to_json(&records)?),
        OutputFormat::Csv => print!("{}", materialize::to_csv(&records)?),
        OutputFormat::Grid => {
            for grid in materialize::room_grids(&plan) {
                println!("{grid}");
            }
        }
    }

    if args.kpi {
        let kpi = PlanKpi::calculate(&plan);
        if !kpi.meets_thresholds(args.min_section_mix) {
            warn!(
                section_mix = kpi.section_mix,
                min_section_mix = args.min_section_mix,
                conflicts = kpi.conflicts,
                "plan below quality thresholds"
            );
        }
        println!("{}", serde_json::to_string_pretty(&kpi)?);
    }

    if let NotifyArgs {
        notifications: Some(path),
        exam_name: Some(exam_name),
        exam_date: Some(date),
        exam_time: Some(start_time),
    } = args.notify
    {
        let exam = ExamDetails::new(exam_name, date, start_time);
        let payload = serde_json::to_string_pretty(&notify::notifications(&plan, &exam))?;
        fs::write(&path, payload).map_err(|source| AppError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "notifications written");
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let roster = RosterImporter::from_path(&args.roster)?;
    let candidates = CandidatePoolBuilder::new(&args.session).build(&roster)?;
    println!(
        "session {}: {} candidates ready for allocation",
        args.session,
        candidates.len()
    );
    Ok(())
}

fn parse_role(raw: &str) -> Result<Role, UnknownRole> {
    raw.parse()
}

fn parse_adjacency(raw: &str) -> Result<AdjacencyPolicy, String> {
    AdjacencyPolicy::parse(raw).ok_or_else(|| format!("unknown adjacency policy '{raw}'"))
}

fn parse_conflict_rule(raw: &str) -> Result<ConflictRule, String> {
    ConflictRule::parse(raw).ok_or_else(|| format!("unknown conflict rule '{raw}'"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}
