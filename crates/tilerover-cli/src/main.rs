//! `tilerover-cli` – headless mission runner.
//!
//! This binary is the program shell around the decision engine.  It:
//!
//! 1. Initialises structured logging (`RUST_LOG`, `TILEROVER_LOG_FORMAT=json`).
//! 2. Loads `~/.tilerover/config.toml` (defaults when absent) and applies
//!    `TILEROVER_*` environment overrides.
//! 3. Builds a simulated demo arena, zeroes the gyro, and spawns the alarm
//!    task.
//! 4. Polls the start signal and runs one round per iteration, logging the
//!    position before and after, until the mission is won, the robot is
//!    stuck, the round limit elapses, or Ctrl-C is received.

mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use tracing::info;

use tilerover_engine::{RoundEngine, RoundOutcome, run_alarm_task};
use tilerover_hal::signal::StartSignal;
use tilerover_hal::sim::SimArena;
use tilerover_types::{RoverError, TileColor};

/// How often the alarm task re-checks the shared flag.
const ALARM_POLL: Duration = Duration::from_millis(100);

/// How long to wait between start-button polls.
const BUTTON_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); TILEROVER_LOG_FORMAT=json
    // emits newline-delimited JSON for log aggregators.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("TILEROVER_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            println!("  No config found; using defaults.");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            eprintln!("{}: {}", "Config error".red(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = cfg.engine.validate() {
        eprintln!("{}: {}", "Config error".red(), e);
        std::process::exit(1);
    }

    // ── Shutdown flag + Ctrl-C handler ────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received; finishing the current round.".yellow());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }

    // ── Arena + engine wiring ─────────────────────────────────────────────
    let arena = build_demo_arena(&cfg);
    let mut chassis = arena.chassis();
    // Zero the gyro at the starting pose before any correction runs.
    chassis.gyro.reset_zero();

    let mut engine = match RoundEngine::new(cfg.engine.clone(), chassis, cfg.seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}: {}", "Engine error".red(), e);
            std::process::exit(1);
        }
    };

    let alarm_task = tokio::spawn(run_alarm_task(
        engine.alarm_flag(),
        Box::new(arena.alarm_output()),
        ALARM_POLL,
    ));

    // The demo arena has nobody to press the button, so press it ourselves.
    arena.set_start_pressed(true);
    let mut button = arena.start_signal();

    // ── Mission loop ──────────────────────────────────────────────────────
    let mut iteration = 0u32;
    let verdict = loop {
        if shutdown.load(Ordering::SeqCst) {
            break format!("stopped by operator after {iteration} round(s)");
        }
        if iteration >= cfg.max_rounds {
            break format!("round limit of {} reached", cfg.max_rounds);
        }
        if !button.pressed() {
            tokio::time::sleep(BUTTON_POLL).await;
            continue;
        }

        iteration += 1;
        info!(iteration, position = ?engine.state().position, "round begin");
        match engine.run_round() {
            Ok(RoundOutcome::Continue) => {
                info!(iteration, position = ?engine.state().position, "round complete");
            }
            Ok(RoundOutcome::Won) => {
                break format!(
                    "mission complete: {} item(s) delivered in {iteration} round(s)",
                    engine.state().inventory.items_delivered
                );
            }
            Err(RoverError::Stuck { x, y }) => {
                break format!("stuck at ({x}, {y}) after {iteration} round(s)");
            }
            Err(e) => {
                eprintln!("{}: {}", "Hardware error".red(), e);
                std::process::exit(1);
            }
        }
    };

    alarm_task.abort();
    println!();
    println!("  {} {}", "Result:".bold(), verdict);
    println!(
        "  Final position: ({}, {})",
        engine.state().position.x,
        engine.state().position.y
    );
}

/// Seed the simulated arena with a fixed demo layout: two deliverable items,
/// two ammunition pickups, and one hazard, on the configured grid.
fn build_demo_arena(cfg: &config::Config) -> SimArena {
    SimArena::new(cfg.engine.bounds, cfg.engine.tile_units)
        .with_color(3, 5, TileColor::Item)
        .with_color(6, 4, TileColor::Item)
        .with_color(4, 2, TileColor::Resource)
        .with_color(2, 4, TileColor::Resource)
        .with_color(5, 3, TileColor::Hazard)
        .with_color(
            cfg.engine.delivery_cell.x,
            cfg.engine.delivery_cell.y,
            TileColor::EscapeMarker,
        )
}

fn print_banner() {
    println!();
    println!("{}", r#"  ______ _ __     ____                     "#.bold().cyan());
    println!("{}", r#" /_  __/(_) /__  / __ \___  _  _____  ____"#.bold().cyan());
    println!("{}", r#"  / /  / / / -_)/ /_/ / _ \| |/ / -_)/ __/"#.bold().cyan());
    println!("{}", r#" /_/  /_/_/\__/ \____/\___/|___/\__//_/   "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "TileRover".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Autonomous grid-arena mission runner");
    println!();
}
