// aviso/src/main.rs
//! Aviso entry point.
//!
//! Wires the core monitor to its collaborators: the reqwest fetcher, the
//! headless-browser session factory and the desktop notifier, then runs
//! the polling loop until Ctrl-C.

use anyhow::{Context, Result};
use aviso::browser::BrowserSessionFactory;
use aviso::cli::{Cli, Commands};
use aviso::logger;
use aviso::notify::{self, DesktopNotifier};
use aviso_core::{Credentials, HttpFetcher, Monitor, MonitorConfig};
use clap::Parser;
use log::warn;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    if let Some(Commands::TestNotify) = args.command {
        notify::send_test_notification();
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            MonitorConfig::load_from_file(path).context("Failed to load configuration")?
        }
        None => MonitorConfig::default(),
    };
    if let Some(state_file) = args.state_file {
        config.state_file = state_file;
    }
    if let Some(dump_path) = args.dump_html {
        config.dump_html = Some(dump_path);
    }

    let credentials = Credentials::from_env();
    if credentials.is_none() {
        warn!("portal credentials not found in the environment; the portal check will be skipped every cycle");
    }

    // Confirm notifications work before the first cycle, not on the first
    // real change.
    notify::send_test_notification();

    let fetcher = HttpFetcher::new(&config).context("Failed to build the HTTP client")?;
    let sessions = BrowserSessionFactory::new(config.portal_login_url.clone(), credentials);

    let mut monitor = Monitor::new(
        config,
        Box::new(fetcher),
        Box::new(sessions),
        Box::new(DesktopNotifier),
    );

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    monitor.run(shutdown).await;

    Ok(())
}
