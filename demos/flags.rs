//! Flags with environment overrides
//!
//! Every flag can also be set from the environment:
//!
//! ```text
//! LISTEN_ADDR=0.0.0.0:9000 cargo run --example flags
//! cargo run --example flags -- --project my-project --verbose
//! cargo run --example flags -- --help
//! ```

use clap::Parser;
use cloud_logger_system::{global, FlagSet, Severity};

#[derive(Parser, Debug)]
#[command(name = "flags", about = "Serve with env-aware flags")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen_addr: String,

    /// Cloud project used for trace correlation
    #[arg(long, default_value = "")]
    project: String,

    /// Include source locations in log lines
    #[arg(long)]
    verbose: bool,

    /// Lowest severity worth reporting at startup
    #[arg(long, default_value_t = Severity::Info)]
    min_severity: Severity,
}

fn main() {
    let mut flags = FlagSet::for_parser::<Args>();
    let args: Args = match flags.parse_into(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };

    global::set_project(&args.project);
    global::set_include_sources(args.verbose);
    global::with_detail("listen_addr", &args.listen_addr)
        .with_detail("min_severity", args.min_severity)
        .log(args.min_severity.max(Severity::Notice), "starting server");
}
