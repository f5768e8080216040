//! Basic logger usage example
//!
//! Demonstrates structured logging to stdout on the default logger and on an
//! explicit one writing to a file.
//!
//! Run with: cargo run --example basic_usage

use cloud_logger_system::prelude::*;
use cloud_logger_system::{global, info, warn};

fn main() -> Result<()> {
    println!("=== Cloud Logger System - Basic Usage Example ===\n");

    println!("1. Default logger, one line per severity:");
    global::set_project("demo-project");
    global::debug("This is a debug message");
    global::info("This is an info message");
    global::notice("This is a notice");
    global::warn("This is a warning message");

    println!("\n2. Labels and details on a branch of an entry:");
    let request = global::with_labels([("request_id", "req-8841"), ("route", "/orders")]);
    request.with_detail("items", 3).info("order accepted");
    request
        .with_details([("latency_ms", 212), ("retries", 1)])
        .notice("order stored");
    info!(request, "user {} checked out", "u-17");

    println!("\n3. Errors carry a stack trace:");
    let parse: std::result::Result<u32, _> = "twelve".parse::<u32>();
    request.with_error(parse.as_ref().err()).error("bad quantity");

    println!("\n4. Trace correlation:");
    let span = SpanContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7")
        .with_sampled(true);
    request.with_span(&span).info("traced call");

    println!("\n5. A logger writing to a file:");
    let path = std::env::temp_dir().join("cloud_logger_demo.log");
    let file_logger = Logger::builder()
        .output(FileAppender::new(&path)?)
        .include_timestamp(true)
        .build();
    warn!(file_logger, "written to {}", path.display());
    file_logger.flush()?;
    println!("   wrote {}", path.display());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
