//! Integration tests for environment-aware flag parsing
//!
//! Each test uses its own flag names so that the environment variables it
//! sets cannot leak into tests running in parallel.

use clap::{Arg, ArgAction, Command, Parser};
use cloud_logger_system::{ConfigError, FlagSet};

#[test]
fn test_environment_overrides_default() {
    std::env::set_var("SET_FLAG", "override");
    let mut flags = FlagSet::new(
        Command::new("app")
            .arg(Arg::new("set-flag").long("set-flag").default_value("default"))
            .arg(Arg::new("other-flag").long("other-flag").default_value("default")),
    );

    let matches = flags.parse_from(["app"]).expect("parsing failed");
    assert_eq!(matches.get_one::<String>("set-flag").unwrap(), "override");
    assert_eq!(matches.get_one::<String>("other-flag").unwrap(), "default");
}

#[test]
fn test_command_line_beats_environment() {
    std::env::set_var("PRECEDENCE_FLAG", "from-env");
    let mut flags = FlagSet::new(
        Command::new("app").arg(Arg::new("precedence-flag").long("precedence-flag")),
    );

    let matches = flags
        .parse_from(["app", "--precedence-flag", "from-cli"])
        .expect("parsing failed");
    assert_eq!(
        matches.get_one::<String>("precedence-flag").unwrap(),
        "from-cli"
    );
}

#[test]
fn test_invalid_overrides_are_all_reported() {
    std::env::set_var("BAD_PORT", "eighty");
    std::env::set_var("BAD_WORKERS", "-3");
    let mut flags = FlagSet::new(
        Command::new("app")
            .arg(
                Arg::new("bad-port")
                    .long("bad-port")
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("bad-workers")
                    .long("bad-workers")
                    .value_parser(clap::value_parser!(u8)),
            ),
    );

    let err = flags
        .parse_from(["app", "--bad-port", "8080"])
        .expect_err("bad environment must fail");
    match &err {
        ConfigError::Overrides(failures) => {
            let names: Vec<&str> = failures.iter().map(|f| f.flag.as_str()).collect();
            assert_eq!(names, ["bad-port", "bad-workers"]);
            assert_eq!(failures[0].variable, "BAD_PORT");
            assert_eq!(failures[0].value, "eighty");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().starts_with("parsing flags: could not set bad-port to eighty"));
    assert!(!flags.parsed());
    assert!(flags.matches().is_none());
}

#[test]
fn test_boolean_flag_from_environment() {
    std::env::set_var("VERBOSE_FLAG", "true");
    let mut flags = FlagSet::new(
        Command::new("app").arg(
            Arg::new("verbose-flag")
                .long("verbose-flag")
                .action(ArgAction::SetTrue),
        ),
    );

    let matches = flags.parse_from(["app"]).expect("parsing failed");
    assert!(matches.get_flag("verbose-flag"));
}

#[test]
fn test_delimited_flag_from_environment() {
    std::env::set_var("DELIMITED_NUMS", "1,2");
    let mut flags = FlagSet::new(
        Command::new("app").arg(
            Arg::new("delimited-nums")
                .long("delimited-nums")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(u8)),
        ),
    );

    let matches = flags.parse_from(["app"]).expect("parsing failed");
    let nums: Vec<u8> = matches
        .get_many::<u8>("delimited-nums")
        .expect("no values")
        .copied()
        .collect();
    assert_eq!(nums, vec![1, 2]);
}

#[test]
fn test_override_of_flag_that_requires_another() {
    std::env::set_var("NEEDS_PARTNER", "on");
    let mut flags = FlagSet::new(
        Command::new("app")
            .arg(
                Arg::new("needs-partner")
                    .long("needs-partner")
                    .requires("partner"),
            )
            .arg(Arg::new("partner").long("partner")),
    );

    let matches = flags
        .parse_from(["app", "--partner", "here"])
        .expect("parsing failed");
    assert_eq!(matches.get_one::<String>("needs-partner").unwrap(), "on");
    assert_eq!(matches.get_one::<String>("partner").unwrap(), "here");
}

#[test]
fn test_second_parse_fails_without_parsing() {
    let mut flags = FlagSet::new(
        Command::new("app").arg(Arg::new("once-flag").long("once-flag").default_value("first")),
    );
    flags.parse_from(["app"]).expect("parsing failed");

    let err = flags.parse_from(["app", "--no-such-flag"]).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyParsed));
}

#[test]
fn test_clap_errors_pass_through() {
    let mut flags = FlagSet::new(Command::new("app").arg(Arg::new("known-flag").long("known-flag")));

    let err = flags.parse_from(["app", "--unknown"]).unwrap_err();
    match err {
        ConfigError::Clap(err) => assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(flags.parsed());
}

#[derive(Parser, Debug)]
#[command(name = "derived")]
struct DerivedArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    derived_listen: String,

    /// Worker count
    #[arg(long, default_value_t = 4)]
    derived_workers: usize,
}

#[test]
fn test_derive_parser() {
    std::env::set_var("DERIVED_WORKERS", "16");
    let mut flags = FlagSet::for_parser::<DerivedArgs>();

    let help = flags.render_help();
    assert!(help.contains("Address to listen on"));
    assert!(help.contains("Also set by environment variable DERIVED_LISTEN"));
    assert!(help.contains("Also set by environment variable DERIVED_WORKERS"));

    let args: DerivedArgs = flags.parse_into(["derived"]).expect("parsing failed");
    assert_eq!(args.derived_listen, "127.0.0.1:8080");
    assert_eq!(args.derived_workers, 16);
}
