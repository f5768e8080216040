//! Command-line flags with environment variable overrides
//!
//! [`FlagSet`] wraps a [`clap::Command`] so that every named flag can also be
//! set from the environment. The variable name is the flag's long name in
//! upper case with dashes replaced by underscores (`--set-flag` becomes
//! `SET_FLAG`). Values given on the command line win over the environment,
//! which wins over the flag's default.
//!
//! ```
//! use clap::{Arg, Command};
//! use cloud_logger_system::FlagSet;
//!
//! let mut flags = FlagSet::new(
//!     Command::new("server").arg(Arg::new("listen-addr").long("listen-addr").default_value(":8080")),
//! );
//! let matches = flags.parse_from(["server", "--listen-addr", ":9090"]).unwrap();
//! assert_eq!(matches.get_one::<String>("listen-addr").unwrap(), ":9090");
//! ```

use clap::builder::Resettable;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Id};
use std::ffi::OsString;
use std::fmt;
use thiserror::Error;

/// A single environment value that does not parse for its flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideFailure {
    pub flag: String,
    pub variable: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for OverrideFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not set {} to {} from {}: {}",
            self.flag, self.value, self.variable, self.reason
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("flags can only be parsed once")]
    AlreadyParsed,

    #[error("parsing flags: {}", join_failures(.0))]
    Overrides(Vec<OverrideFailure>),

    #[error(transparent)]
    Clap(#[from] clap::Error),
}

fn join_failures(failures: &[OverrideFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    /// Print the error and exit the process.
    ///
    /// Help and version requests exit successfully, as clap does.
    pub fn exit(&self) -> ! {
        match self {
            ConfigError::Clap(err) => err.exit(),
            other => {
                eprintln!("error: {}", other);
                std::process::exit(2)
            }
        }
    }
}

/// Environment variable bound to one flag
#[derive(Debug, Clone)]
struct EnvBinding {
    id: Id,
    long: String,
    variable: String,
}

/// A set of flags that can be parsed once, from the command line and the
/// environment.
#[derive(Debug)]
pub struct FlagSet {
    command: Command,
    bindings: Vec<EnvBinding>,
    matches: Option<ArgMatches>,
    parsed: bool,
}

/// Environment variable name for a flag's long name
pub fn env_var_name(long: &str) -> String {
    long.to_uppercase().replace('-', "_")
}

impl FlagSet {
    /// Bind every flag of `command` that has a long name to its environment
    /// variable, and note the variable in the flag's help.
    pub fn new(command: Command) -> Self {
        let bindings: Vec<EnvBinding> = command
            .get_arguments()
            .filter(|arg| !matches!(arg.get_id().as_str(), "help" | "version"))
            .filter_map(|arg| {
                let long = arg.get_long()?;
                Some(EnvBinding {
                    id: arg.get_id().clone(),
                    long: long.to_string(),
                    variable: env_var_name(long),
                })
            })
            .collect();

        let mut command = command;
        for binding in &bindings {
            let variable = binding.variable.clone();
            command = command.mut_arg(&binding.id, |arg| {
                let help = match arg.get_help() {
                    Some(help) if !help.to_string().is_empty() => {
                        format!("{}\nAlso set by environment variable {}", help, variable)
                    }
                    _ => format!("Also set by environment variable {}", variable),
                };
                arg.env(variable).hide_env(true).help(help)
            });
        }

        Self {
            command,
            bindings,
            matches: None,
            parsed: false,
        }
    }

    /// Flag set for a `#[derive(Parser)]` type
    pub fn for_parser<P: CommandFactory>() -> Self {
        Self::new(P::command())
    }

    /// Parse the process arguments
    pub fn parse(&mut self) -> Result<&ArgMatches, ConfigError> {
        self.parse_from(std::env::args_os())
    }

    /// Parse `args`, whose first item is the binary name.
    ///
    /// Environment overrides are validated first; if any of them does not
    /// parse, nothing is parsed and every failure is reported. A flag set
    /// only parses once; later calls fail with
    /// [`ConfigError::AlreadyParsed`].
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<&ArgMatches, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        if self.parsed {
            return Err(ConfigError::AlreadyParsed);
        }

        let failures = self.check_overrides();
        if !failures.is_empty() {
            return Err(ConfigError::Overrides(failures));
        }

        self.parsed = true;
        let matches = self.command.try_get_matches_from_mut(args)?;
        Ok(&*self.matches.insert(matches))
    }

    /// Parse `args` straight into a `#[derive(Parser)]` type
    pub fn parse_into<P, I, T>(&mut self, args: I) -> Result<P, ConfigError>
    where
        P: FromArgMatches,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.parse_from(args)?;
        Ok(P::from_arg_matches(matches)?)
    }

    /// Validate each present environment value with its flag's own parser.
    fn check_overrides(&self) -> Vec<OverrideFailure> {
        let mut failures = Vec::new();
        for binding in &self.bindings {
            let Some(value) = std::env::var_os(&binding.variable) else {
                continue;
            };
            let Some(arg) = self.command.get_arguments().find(|a| a.get_id() == &binding.id) else {
                continue;
            };

            // The real arg, cut loose from the other args it refers to
            let detached = arg
                .clone()
                .required(false)
                .requires(Resettable::Reset)
                .required_unless_present(Resettable::Reset)
                .conflicts_with(Resettable::Reset)
                .overrides_with(Resettable::Reset)
                .group(Resettable::Reset);
            let env_only = Command::new("env-override")
                .no_binary_name(true)
                .arg(detached);

            if let Err(err) = env_only.try_get_matches_from(std::iter::empty::<OsString>()) {
                failures.push(OverrideFailure {
                    flag: binding.long.clone(),
                    variable: binding.variable.clone(),
                    value: value.to_string_lossy().into_owned(),
                    reason: first_line(&err.to_string()),
                });
            }
        }
        failures
    }

    /// Help text, including the environment variable of each flag
    pub fn render_help(&mut self) -> String {
        self.command.render_help().to_string()
    }

    pub fn matches(&self) -> Option<&ArgMatches> {
        self.matches.as_ref()
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Environment variable bound to the flag with long name `long`
    pub fn env_var(&self, long: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|binding| binding.long == long)
            .map(|binding| binding.variable.as_str())
    }
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
