use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Runs a project's auto-fix, debug build and release build in sequence
#[derive(Parser, Debug)]
#[command(
    name = "buildchain",
    about = "Runs a project's auto-fix, debug build and release build in sequence",
    version,
    long_about = "buildchain runs `cargo fix`, `cargo build` and `cargo build --release` \
                  one after another. A failing debug build stops the sequence and its \
                  exit code becomes buildchain's exit code; fix and release failures \
                  are reported but do not stop it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Flags that replace values loaded from `BUILDCHAIN_*` variables.
    ///
    /// `--log-level` beats `-v`/`-q`. `--no-separator` and `--separator-lines`
    /// both force the separator setting regardless of the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        let log_level = if let Some(level) = &self.log_level {
            Some(level.clone())
        } else if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        let (program, separator) = match &self.command {
            Commands::Run(run) => {
                let separator = if run.no_separator {
                    Some(false)
                } else if run.separator_lines.is_some() {
                    Some(true)
                } else {
                    None
                };
                (run.program.clone(), separator)
            }
            Commands::Plan(plan) => (plan.program.clone(), None),
        };

        ConfigOverrides {
            program,
            log_level,
            separator,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run fix, debug build and release build",
        long_about = "Runs the three stages in order against the project directory.\n\n\
                      Examples:\n  \
                      buildchain run\n  \
                      buildchain run /path/to/project\n  \
                      buildchain run --no-separator --summary json"
    )]
    Run(RunArgs),

    #[command(
        about = "Show the commands `run` would execute",
        long_about = "Prints the stage commands without running them.\n\n\
                      Examples:\n  \
                      buildchain plan\n  \
                      buildchain plan --format json"
    )]
    Plan(PlanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PROGRAM",
        help = "Toolchain driver to invoke (defaults to BUILDCHAIN_PROGRAM or cargo)"
    )]
    pub program: Option<String>,

    #[arg(long, help = "Do not print blank lines between stages")]
    pub no_separator: bool,

    #[arg(
        long,
        value_name = "LINES",
        conflicts_with = "no_separator",
        help = "Print a fixed number of blank lines between stages instead of a third of the terminal height"
    )]
    pub separator_lines: Option<u16>,

    #[arg(
        long,
        value_enum,
        default_value = "none",
        help = "Print a summary of stage results to stderr after the run"
    )]
    pub summary: SummaryFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(long, value_name = "PROGRAM", help = "Toolchain driver to invoke")]
    pub program: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormatArg {
    None,
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

impl SummaryFormatArg {
    pub fn output_format(&self) -> Option<super::output::OutputFormat> {
        match self {
            SummaryFormatArg::None => None,
            SummaryFormatArg::Json => Some(OutputFormatArg::Json.into()),
            SummaryFormatArg::Yaml => Some(OutputFormatArg::Yaml.into()),
            SummaryFormatArg::Human => Some(OutputFormatArg::Human.into()),
        }
    }
}
