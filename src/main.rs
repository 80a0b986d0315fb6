mod error;
mod form;
mod list;
mod models;
mod tui;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use form::{JobForm, Submission};
use models::{Draft, JobPosting};

#[derive(Parser)]
#[command(name = "jobpost")]
#[command(about = "Post new job listings and review the ones created this session")]
struct Cli {
    /// Write log output to this file (the interactive form logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive job form (default)
    Ui {
        /// Filter for the job list (accepted, not applied yet)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Validate a job posting without the form
    Check {
        /// Job title (at least 10 characters)
        #[arg(long, default_value = "")]
        title: String,

        /// Company name
        #[arg(short, long, default_value = "")]
        company: String,

        /// Job location
        #[arg(short, long, default_value = "")]
        location: String,

        /// Job type (Full-Time, Part-Time, Contract)
        #[arg(short = 't', long, default_value = "")]
        job_type: String,

        /// Job description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Qualifications
        #[arg(short, long, default_value = "")]
        qualifications: String,

        /// Date posted, YYYY-MM-DD (defaults to now)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Number of postings already in the collection
        #[arg(long, default_value = "0")]
        existing: usize,
    },
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // The terminal belongs to the form while it is open.
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Midnight of `date` in local time, or now if no date was given.
fn draft_date(date: Option<NaiveDate>) -> Result<DateTime<Local>> {
    match date {
        Some(date) => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("Invalid date: {}", date))?;
            Local
                .from_local_datetime(&midnight)
                .earliest()
                .ok_or_else(|| anyhow!("Date {} has no local midnight", date))
        }
        None => Ok(Local::now()),
    }
}

/// Placeholder records standing in for an existing collection of `n` postings.
fn placeholder_jobs(n: usize, now: DateTime<Local>) -> Vec<JobPosting> {
    (1..=n)
        .map(|id| JobPosting {
            id,
            title: format!("Existing posting {}", id),
            date_posted: now,
            company: String::new(),
            job_type: models::JobType::FullTime,
            location: String::new(),
            description: String::new(),
            qualifications: String::new(),
        })
        .collect()
}

fn run_check(draft: Draft, existing: usize) -> Result<()> {
    let now = Local::now();
    let jobs = placeholder_jobs(existing, now);
    let mut form = JobForm::new(now);
    *form.draft_mut() = draft;

    let mut created = None;
    match form.submit(&jobs, now, |next| created = next.last().cloned()) {
        Submission::Accepted(_) => {
            let posting = created.ok_or_else(|| anyhow!("Accepted posting was not appended"))?;
            println!("{}", serde_json::to_string_pretty(&posting)?);
            Ok(())
        }
        Submission::Rejected(errors) => {
            println!("Validation failed:");
            for message in form.error_messages() {
                println!("  - {}", message);
            }
            Err(anyhow!("{} validation error(s)", errors.len()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui { filter: None });
    let interactive = matches!(command, Commands::Ui { .. });
    init_logging(cli.log_file.as_deref(), interactive)?;

    match command {
        Commands::Ui { filter } => tui::run_ui(filter)?,

        Commands::Check {
            title,
            company,
            location,
            job_type,
            description,
            qualifications,
            date,
            existing,
        } => {
            let draft = Draft {
                title,
                company,
                location,
                job_type,
                description,
                qualifications,
                date: draft_date(date)?,
            };
            run_check(draft, existing)?;
        }
    }

    Ok(())
}
