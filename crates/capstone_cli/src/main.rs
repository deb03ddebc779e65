//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `capstone_core` linkage and storage bootstrap without a UI host.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `capstone_cli [DB_PATH]`. Without a path the store lives in memory.
//! Set `CAPSTONE_LOG_DIR` (absolute) to write rolling logs there.

use capstone_core::db::{open_db, open_db_in_memory};
use capstone_core::{init_logging, CoreConfig, DashboardService, SqliteKvRepository};
use log::error;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("capstone_core ping={}", capstone_core::ping());
    println!("capstone_core version={}", capstone_core::core_version());

    match summarize(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("capstone_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(db_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::default();
    if let Ok(log_dir) = std::env::var("CAPSTONE_LOG_DIR") {
        init_logging(&config.log_level, &log_dir)?;
    }

    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteKvRepository::try_new(&conn)?;
    let service = DashboardService::open(repo, &config)?;

    let projects = service.projects();
    let tasks: usize = projects.iter().map(|project| project.tasks.len()).sum();
    println!("storage={}", db_path.as_deref().unwrap_or(":memory:"));
    println!("projects={} tasks={}", projects.len(), tasks);
    println!(
        "notifications={} authenticated={}",
        service.store().notifications().len(),
        service.is_authenticated()
    );
    Ok(())
}
