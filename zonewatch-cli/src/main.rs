use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zonewatch_core::colors::CatppuccinExt;
use zonewatch_core::config::{DEFAULT_API_BASE, DEFAULT_ZONE_ID};
use zonewatch_core::output::{get_formatter, OutputFormat};
use zonewatch_core::{ApiToken, CancellationToken, CheckReport, PollerConfig, ZoneStatusPoller};

/// Exit code for `--once` when the zone is not live yet.
const EXIT_NOT_LIVE: i32 = 2;

#[derive(Parser)]
#[command(name = "zonewatch")]
#[command(about = "Poll a Cloudflare zone until its DNS is live")]
#[command(version)]
struct Cli {
    /// Cloudflare zone id to watch
    #[arg(short, long, env = "CLOUDFLARE_ZONE_ID", default_value = DEFAULT_ZONE_ID)]
    zone_id: String,

    /// Seconds to sleep between checks
    #[arg(short, long, default_value_t = 540)]
    interval: u64,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human")]
    format: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Check once and exit: 0 if live, 2 if not
    #[arg(long, conflicts_with = "until_active")]
    once: bool,

    /// Stop polling as soon as the zone is live
    #[arg(long)]
    until_active: bool,

    /// API base URL (for testing against a local server)
    #[arg(long, env = "CLOUDFLARE_API_BASE", default_value = DEFAULT_API_BASE, hide = true)]
    api_base: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries only check reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let output_format: OutputFormat = cli.format.parse().unwrap_or_default();

    let token = ApiToken::from_env();
    if token.is_placeholder() {
        eprintln!(
            "{} CLOUDFLARE_API_TOKEN is not set; every check will fail authorization",
            "Warning:".ctp_yellow()
        );
    }

    let config = PollerConfig::new(cli.zone_id, token)
        .with_api_base(cli.api_base)
        .with_interval(Duration::from_secs(cli.interval))
        .with_request_timeout(Duration::from_secs(cli.timeout));

    let poller = match ZoneStatusPoller::from_config(config) {
        Ok(poller) => poller,
        Err(e) => {
            eprintln!("{} {}", "Error:".ctp_red(), e);
            std::process::exit(1);
        }
    };

    let formatter = get_formatter(output_format, !cli.no_color);
    let print_report = |report: &CheckReport| println!("{}", formatter.format_report(report));

    if cli.once {
        let report = poller.check_zone_status().await;
        print_report(&report);
        if !report.is_live() {
            std::process::exit(EXIT_NOT_LIVE);
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    info!(
        zone_id = poller.zone_id(),
        interval_secs = poller.interval().as_secs(),
        "Watching zone"
    );

    let checks = if cli.until_active {
        poller.run_until_live(&cancel, print_report).await
    } else {
        poller.run_until_cancelled(&cancel, print_report).await
    };

    info!(checks, "Stopped watching zone");
    Ok(())
}
