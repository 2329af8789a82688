use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

use vigia_alert::throttle::NotificationThrottle;
use vigia_monitor::clock::SystemClock;
use vigia_monitor::config::MonitorConfig;
use vigia_monitor::monitor::Monitor;
use vigia_notify::email::EmailChannel;
use vigia_probe::pinger::SystemPing;
use vigia_probe::prober::Prober;
use vigia_store::EndpointStore;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  vigia-monitor [config.toml]              Start the connectivity monitor");
    eprintln!("  vigia-monitor query <config.toml> <sql>  Run a read-only query against the endpoint database");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vigia=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("query") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("query requires <config.toml> and <sql> arguments")
            })?;
            let sql = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("query requires <sql> argument")
            })?;
            run_query(config_path, sql)
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or("config/monitor.toml");
            run_monitor(config_path).await
        }
    }
}

/// Diagnostic read-only query against the endpoint database. Anything that
/// is not a pure read is rejected by the store before execution.
#[allow(clippy::print_stdout)]
fn run_query(config_path: &str, sql: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let store = EndpointStore::open(Path::new(&config.database.path))?;
    let rows = store.run_readonly_script(sql)?;
    for (i, row) in rows.iter().enumerate() {
        println!("{} - {}", i + 1, row.join(" "));
    }
    tracing::info!(rows = rows.len(), "query finished");
    Ok(())
}

async fn run_monitor(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let window = config.window.active_window()?;

    tracing::info!(
        database = %config.database.path,
        smtp = %config.smtp.host,
        "vigia-monitor starting"
    );

    let store = Arc::new(EndpointStore::open(Path::new(&config.database.path))?);
    let pinger = Arc::new(SystemPing::new(config.probe_timeout_secs));
    let prober = Prober::new(
        pinger,
        config.probe_attempts,
        config.probe_failure_threshold,
    );
    let notifier = Arc::new(EmailChannel::new(
        &config.smtp.host,
        config.smtp.port,
        config.smtp.username.as_deref(),
        config.smtp.password.as_deref(),
        config.smtp.starttls,
        &config.smtp.from,
    )?);
    let throttle = NotificationThrottle::new(config.notify_threshold, config.throttle_reset);

    let mut monitor = Monitor::new(
        store,
        prober,
        notifier,
        Arc::new(SystemClock),
        window,
        throttle,
        config.gateway_offset,
        Duration::from_secs(config.poll_interval_secs),
        config.smtp.recipients.clone(),
        config.notify_all_clear,
    );

    tokio::select! {
        _ = monitor.run() => {}
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    Ok(())
}
