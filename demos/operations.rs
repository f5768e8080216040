//! Operations and context example
//!
//! Shows the first/last markers of a long-running operation and how an
//! entry attached to the current thread reaches code that never sees it.
//!
//! Run with: cargo run --example operations

use cloud_logger_system::context;
use cloud_logger_system::prelude::*;

fn import_rows(rows: &[&str]) {
    let entry = context::from_context();
    for (index, row) in rows.iter().enumerate() {
        entry.with_detail("row", index).debug(format!("imported {}", row));
    }
}

fn main() -> Result<()> {
    println!("=== Cloud Logger System - Operations Example ===\n");

    let logger = Logger::builder().project("demo-project").build();

    let mut job = logger.with_labels([("job", "nightly-import")]);
    job.start_operation("import-2024-06-01", "importer");

    context::scope(job.clone(), || import_rows(&["alpha", "beta", "gamma"]));

    job.with_detail("rows", 3).info("import finished");
    job.end_operation();

    // Nothing attached any more; this falls back to the default logger
    context::from_context().info("outside any scope");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
