//! Attendance Report - Conference Call Attendance CSV Reports
//!
//! Logs on to the collaboration platform as a bot, walks the feed of one
//! conversation, and writes two CSV files listing, per ended conference call,
//! which conversation members attended and which did not.
//!
//! # Usage
//!
//! ```bash
//! # Settings from ./config.json
//! attendance-report
//!
//! # Only calls between two dates (inclusive), reports under ./out
//! attendance-report --start-date 2024/01/01 --end-date 2024/01/31 --out-dir out
//!
//! # Through a proxy, with debug logging
//! RUST_LOG=debug attendance-report --proxy http://proxy.local:3128
//! ```
//!
//! # Output
//!
//! - `attenders.csv` - one row per call participant
//! - `non-attenders.csv` - one row per conversation member missing from a call
//!
//! Both files share the header `conferenceId,date,participantName`.

mod config;
mod session;

use attendance_core::{ReportError, ReportWriter, Session, Stage, build_report};
use clap::Parser;
use config::{FileConfig, Settings};
use session::HttpSession;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Conference call attendance reporter.
#[derive(Parser, Debug, Clone)]
#[command(name = "attendance-report")]
#[command(about = "Writes per-call attendance CSV reports for a conversation")]
pub struct Args {
    /// JSON config file with domain, bot credentials and conversation.
    #[arg(short, long, env = "ATTENDANCE_REPORT_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Platform domain, or a full base URL.
    #[arg(long, env = "ATTENDANCE_REPORT_DOMAIN")]
    pub domain: Option<String>,

    /// Bot OAuth client id.
    #[arg(long, env = "ATTENDANCE_REPORT_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Bot OAuth client secret.
    #[arg(long, env = "ATTENDANCE_REPORT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Conversation whose calls are reported.
    #[arg(long, env = "ATTENDANCE_REPORT_CONVERSATION_ID")]
    pub conversation_id: Option<String>,

    /// First day to report (YYYY/MM/DD).
    #[arg(long, env = "ATTENDANCE_REPORT_START_DATE")]
    pub start_date: Option<String>,

    /// Last day to report (YYYY/MM/DD).
    #[arg(long, env = "ATTENDANCE_REPORT_END_DATE")]
    pub end_date: Option<String>,

    /// Directory the reports are written to.
    #[arg(short, long, env = "ATTENDANCE_REPORT_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// File name of the attenders report.
    #[arg(long, env = "ATTENDANCE_REPORT_ATTENDERS_FILE", default_value = "attenders.csv")]
    pub attenders_file: String,

    /// File name of the non-attenders report.
    #[arg(long, env = "ATTENDANCE_REPORT_NON_ATTENDERS_FILE", default_value = "non-attenders.csv")]
    pub non_attenders_file: String,

    /// HTTP proxy for all platform traffic.
    #[arg(long, env = "http_proxy")]
    pub proxy: Option<String>,

    /// Request timeout in seconds.
    #[arg(short, long, env = "ATTENDANCE_REPORT_TIMEOUT", default_value = "30")]
    pub timeout: u64,
}

async fn run(args: Args) -> anyhow::Result<()> {
    let file = FileConfig::load(&args.config)?;
    let settings = Settings::resolve(&args, file)?;
    let window = settings.window()?;
    if let (Some(start), Some(end)) = (window.start(), window.end()) {
        info!(%start, %end, "reporting calls inside date window");
    }

    if let Some(ref proxy) = settings.platform.proxy {
        info!(%proxy, "using proxy");
    }

    info!(base_url = %settings.platform.base_url, "logging on");
    let session = HttpSession::logon(&settings.platform)
        .await
        .map_err(|source| ReportError::Transport {
            stage: Stage::Logon,
            source,
        })?;
    info!(member = session.own_member_id(), "logon was successful");

    let report = build_report(&session, &settings.conversation_id, &window).await?;
    if !report.warnings.is_empty() {
        warn!(
            skipped = report.warnings.len(),
            "calls without participant data were left out of both reports"
        );
    }

    let paths = ReportWriter::new(&settings.out_dir)
        .with_file_names(&settings.attenders_file, &settings.non_attenders_file)
        .write(&report)
        .await?;
    info!(
        calls = report.calls.len(),
        attenders = %paths.attenders.display(),
        non_attenders = %paths.non_attenders.display(),
        "reports written"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
