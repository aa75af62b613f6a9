//! # ifwatch
//!
//! A live per-interface network traffic monitor for Linux consoles.
//!
//! ## Features
//!
//! - Counts every link-layer packet system-wide, classified per interface
//!   as IPv4, IPv6 or non-IP, with IPv4 checksum failures tallied
//! - Windowed activity rate and peak per interface, scrollable live table
//! - Periodic counter snapshots to a log, rotated on SIGUSR1
//! - Cooperates with sibling instances: one monitor of each kind at a
//!   time, promiscuous mode enabled and restored collectively
//!
//! ## Example
//!
//! ```rust,no_run
//! use ifwatch::cli::Args;
//! use ifwatch::run;
//!
//! let args = Args {
//!     list: true,
//!     ..Default::default()
//! };
//!
//! run(args).expect("Failed to run ifwatch");
//! ```

pub mod aggregator;
pub mod capture;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod facility;
pub mod input;
pub mod logger;
pub mod monitor;
pub mod platform;
pub mod registry;
pub mod select;
pub mod signal;
pub mod view;

use anyhow::Result;
use cli::Args;
use crossterm::{execute, terminal::*};
use std::path::PathBuf;

/// Main entry point for the ifwatch application.
///
/// Dispatches on the parsed command-line arguments: list interfaces,
/// open the interface picker, or run the live statistics monitor.
pub fn run(args: Args) -> Result<()> {
    if args.list {
        return list_interfaces();
    }

    let mut config = config::Config::load()?;
    config.apply_args(&args);

    let table = platform::create_table()?;

    if args.select {
        return run_picker(table.as_ref());
    }

    let state_dir = args
        .state_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(facility::FacilityCoordinator::default_state_dir);
    let log_path = args
        .logfile
        .clone()
        .unwrap_or_else(|| logger::DEFAULT_LOG_NAME.to_string());

    let mut promisc_ctl = platform::create_promisc_control()?;

    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;

    let result = monitor::run_monitor(
        &config,
        table.as_ref(),
        promisc_ctl.as_mut(),
        state_dir,
        &log_path,
    );

    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen);

    Ok(result?)
}

fn list_interfaces() -> Result<()> {
    let table = platform::create_table()?;
    let registry = registry::InterfaceRegistry::discover(table.as_ref())?;

    for name in registry.names() {
        println!("{name}");
    }

    Ok(())
}

fn run_picker(table: &dyn platform::SystemTable) -> Result<()> {
    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;

    let selection = select::select_interface(table, true);

    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen);

    // An empty line means "all interfaces" to a consuming script.
    match selection? {
        Some(name) => println!("{name}"),
        None => eprintln!("Selection aborted"),
    }

    Ok(())
}
