//! CampusDesk front-desk command line.
//!
//! Runs against the hosted backend when `CAMPUSDESK_REMOTE_URL` and
//! `CAMPUSDESK_REMOTE_KEY` are set, and against a local SQLite file
//! otherwise.
//!
//! Usage:
//!   campusdesk summary
//!   campusdesk pay STU-1 2000 --method upi
//!   campusdesk allocate ROOM-B201 STU-1

use anyhow::{Context, Result, bail};
use campusdesk_remote::RemoteConfig;
use campusdesk_storage::SqliteStore;
use campusdesk_sync::{CampusData, DataConfig, DataMode, FallbackPolicy, MutationOutcome};
use campusdesk_types::{
    HostelRoomUpdate, Payment, PaymentMethod, RoomStatus, StudentId, new_record_id,
    receipt_number,
};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "campusdesk")]
#[command(about = "Students, fees and hostel rooms from the command line")]
struct Args {
    /// Local database used when no remote backend is configured
    #[arg(short, long, default_value = "campusdesk.db")]
    data: PathBuf,

    /// Name recorded in student audit trails
    #[arg(short, long, default_value = "admin")]
    operator: String,

    /// Drop changes the backend refuses instead of keeping them for the session
    #[arg(long)]
    strict: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts and outstanding fees
    Summary,
    /// List students with their balances
    Students,
    /// Record a fee payment
    Pay {
        student: String,
        amount: i64,
        #[arg(short, long, default_value = "cash")]
        method: String,
    },
    /// List hostel rooms
    Rooms,
    /// Place a student in a room
    Allocate { room: String, student: String },
    /// Move a student out of a room
    Vacate { room: String, student: String },
    /// Put a room under maintenance
    Maintenance { room: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let local = SqliteStore::open(&args.data)
        .with_context(|| format!("Failed to open {}", args.data.display()))?;
    let config = DataConfig {
        operator: args.operator.clone(),
        fallback_policy: if args.strict {
            FallbackPolicy::Skip
        } else {
            FallbackPolicy::ApplyLocally
        },
    };
    let data = CampusData::from_config(&RemoteConfig::from_env(), Arc::new(local), config);
    if let Some(report) = data.initialize().await {
        if !report.fully_remote() {
            info!("Some collections are showing demo data: {:?}", report);
        }
    }
    if data.mode() == DataMode::LocalOnly {
        info!("Working offline against {}", args.data.display());
    }

    match args.command {
        Command::Summary => summary(&data).await,
        Command::Students => {
            for s in data.students().await {
                println!(
                    "{:<8} {:<24} {:<24} {:>8}",
                    s.student_id,
                    s.full_name(),
                    s.course,
                    s.fee_balance
                );
            }
        }
        Command::Pay {
            student,
            amount,
            method,
        } => {
            let method: PaymentMethod = method.parse()?;
            let student_id = parse_student(&student)?;
            let id = new_record_id("PAY");
            let date = chrono::Utc::now().date_naive();
            let payment = Payment {
                receipt_number: receipt_number(date, &id),
                id,
                student_id,
                amount,
                method,
                date,
                collected_by: args.operator,
            };
            let recorded = finish(data.add_payment(payment).await)?;
            println!("Receipt {}", recorded.receipt_number);
        }
        Command::Rooms => {
            for r in data.hostel_rooms().await {
                println!(
                    "{:<10} {}-{:<5} {}/{} {}",
                    r.id,
                    r.building,
                    r.room_number,
                    r.occupants.len(),
                    r.capacity,
                    r.status.as_str()
                );
            }
        }
        Command::Allocate { room, student } => {
            let student_id = parse_student(&student)?;
            finish(data.allocate_room(&room, &student_id).await)?;
        }
        Command::Vacate { room, student } => {
            let student_id = parse_student(&student)?;
            finish(data.vacate_room(&room, &student_id).await)?;
        }
        Command::Maintenance { room } => {
            let update = HostelRoomUpdate::status(RoomStatus::Maintenance);
            finish(data.update_hostel_room(&room, update).await)?;
        }
    }

    for notice in data.notifications().iter().rev() {
        println!("[{:?}] {}", notice.severity, notice.message);
    }
    Ok(())
}

async fn summary(data: &CampusData) {
    let students = data.students().await;
    let rooms = data.hostel_rooms().await;
    let vacancies: usize = rooms.iter().map(|r| r.vacancies()).sum();
    println!("Mode:         {:?}", data.mode());
    println!("Students:     {}", students.len());
    println!("Payments:     {}", data.payments().await.len());
    println!("Outstanding:  {}", data.total_outstanding().await);
    println!("Rooms:        {} ({} beds free)", rooms.len(), vacancies);
    println!("Exams:        {}", data.exams().await.len());
}

fn parse_student(raw: &str) -> Result<StudentId> {
    StudentId::parse(raw).with_context(|| format!("Invalid student id: {raw:?}"))
}

fn finish<T>(outcome: MutationOutcome<T>) -> Result<T> {
    match outcome {
        MutationOutcome::Rejected { reason } => bail!("Rejected: {reason}"),
        MutationOutcome::RemoteError { reason } => bail!("Backend refused the change: {reason}"),
        other => other
            .into_value()
            .context("Mutation reported success without a value"),
    }
}
