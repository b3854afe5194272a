//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `braindump_core` linkage without any UI runtime.
//! - Optionally open a data directory and print a deterministic summary.
//!
//! Usage: `braindump_cli [ABSOLUTE_DATA_DIR]`

use braindump_core::{
    filter_by_term, group_by_status, CaptureService, CoreConfig, Term, TermFilter,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("braindump_core ping={}", braindump_core::ping());
    println!("braindump_core version={}", braindump_core::core_version());

    let Some(data_dir) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match summarize(&data_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(data_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::new(data_dir)?;
    let log_dir = config.log_dir();
    braindump_core::init_logging(config.log_level(), &log_dir.to_string_lossy())?;

    let service = CaptureService::open_sqlite(&config)?;
    println!("items={}", service.items().len());
    println!("categories={}", service.categories().len());
    for (status, count) in group_by_status(service.items()).counts() {
        println!("status.{}={count}", status.as_str());
    }
    for term in Term::ALL {
        let count = filter_by_term(service.items(), TermFilter::Only(term)).len();
        println!("term.{}={count}", term.as_str());
    }
    service.close()?;
    Ok(())
}
