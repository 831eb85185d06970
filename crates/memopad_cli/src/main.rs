//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memopad_core` linkage, logging
//!   bootstrap and schema migrations independently of any UI host.

use std::process::ExitCode;

fn main() -> ExitCode {
    let log_dir = std::env::temp_dir().join("memopad").join("logs");
    match memopad_core::init_logging(
        memopad_core::default_log_level(),
        &log_dir.to_string_lossy(),
    ) {
        Ok(()) => {
            if let Some((level, dir)) = memopad_core::logging_status() {
                println!("memopad_core logging=ok level={level} dir={}", dir.display());
            }
        }
        Err(err) => eprintln!("memopad_core logging=failed error={err}"),
    }

    println!("memopad_core version={}", memopad_core::core_version());

    match memopad_core::db::open_db_in_memory() {
        Ok(_) => {
            println!(
                "memopad_core migrations=ok latest_version={}",
                memopad_core::db::migrations::latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("memopad_core migrations=failed error={err}");
            ExitCode::FAILURE
        }
    }
}
