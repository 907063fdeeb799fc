//! VidSleuth: video library feature inventory.
//!
//! Thin binary entry point. Scanning and classification live in
//! `vidsleuth-core`; session state, rendering and export in `vidsleuth-cli`.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vidsleuth_cli::export;
use vidsleuth_cli::status::status_line;
use vidsleuth_cli::table::{render_table, TableStyle};
use vidsleuth_cli::{AppPhase, AppState, Column};
use vidsleuth_core::probe::FfprobeInvoker;
use vidsleuth_core::scanner::ScanConfig;

/// Pause between message pumps while a scan runs.
const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// Minimum gap between status lines when stderr is not a terminal.
const LOG_STATUS_INTERVAL: Duration = Duration::from_secs(5);

fn build_config(cli: &Cli) -> ScanConfig {
    let mut config = ScanConfig::default().with_probe_timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(jobs) = cli.jobs {
        config = config.with_workers(jobs);
    }
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    if let Some(ref program) = cli.ffprobe {
        config = config.with_probe_program(program.clone());
    }
    if !cli.extensions.is_empty() {
        config = config.with_extensions(cli.extensions.iter());
    }
    config
}

/// Pump progress until the scan ends, echoing the status line to stderr.
fn run_scan(state: &mut AppState) {
    let interactive = std::io::stderr().is_terminal();
    let mut last_logged = Instant::now();

    while state.phase == AppPhase::Scanning {
        state.process_scan_messages();
        if interactive {
            eprint!("\r\x1b[2K{}", status_line(state));
            let _ = std::io::stderr().flush();
        } else if last_logged.elapsed() >= LOG_STATUS_INTERVAL {
            tracing::info!("{}", status_line(state));
            last_logged = Instant::now();
        }
        std::thread::sleep(PUMP_INTERVAL);
    }
    if interactive {
        eprint!("\r\x1b[2K");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("VidSleuth starting");

    let sort = match cli.sort.as_deref() {
        Some(label) => match Column::from_label(label) {
            Some(column) => Some((column, cli.desc)),
            None => bail!("unknown sort column '{label}'"),
        },
        None => None,
    };

    let config = build_config(&cli);
    // A missing probe tool is fatal before any scanning begins.
    let probe = FfprobeInvoker::from_config(&config)?;

    let mut state = AppState::new(config, Arc::new(probe));
    state
        .start_scan(cli.root.clone())
        .with_context(|| format!("cannot scan {}", cli.root.display()))?;
    run_scan(&mut state);

    if state.phase == AppPhase::Failed {
        bail!(
            "{}",
            state.scan_failure.as_deref().unwrap_or("scan failed")
        );
    }

    let rows = state.view(&cli.filter, sort);
    let style = if cli.ascii {
        TableStyle::ascii()
    } else {
        TableStyle::unicode()
    };
    print!("{}", render_table(&rows, &style));

    if let Some(ref path) = cli.csv {
        export::export_csv(&rows, path)?;
    }
    if let Some(ref path) = cli.json {
        export::export_json(&rows, path)?;
    }

    for (path, message) in &state.scan_errors {
        tracing::debug!("{path}: {message}");
    }
    eprintln!("{}", status_line(&state));

    Ok(())
}
