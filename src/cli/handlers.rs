//! Subcommand handlers. Each returns the process exit code.

use super::commands::{PlanArgs, RunArgs};
use super::output::OutputFormatter;
use crate::config::BuildchainConfig;
use crate::pipeline::{BuildOrchestrator, OrchestratorError, ProcessRunner, Separator};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error};

/// Exit code for invalid configuration or arguments
pub const EXIT_CONFIG_ERROR: i32 = 2;

pub fn handle_run(args: &RunArgs, config: &BuildchainConfig) -> i32 {
    let project = match resolve_project_path(args.project_path.clone()) {
        Ok(path) => path,
        Err(code) => return code,
    };

    let separator = select_separator(config, args.separator_lines);
    debug!(?separator, project = %project.display(), "Starting build sequence");

    let mut orchestrator =
        BuildOrchestrator::new(config, &project, ProcessRunner::new(), separator);
    let mut stdout = io::stdout();

    let (report, exit_code) = match orchestrator.run(&mut stdout) {
        Ok(report) => {
            let code = report.exit_code;
            (Some(report), code)
        }
        Err(OrchestratorError::BuildFailed { code, report }) => {
            eprintln!(
                "Error: debug build failed with exit code {}; release build skipped",
                code
            );
            (Some(report), code)
        }
        Err(e) => {
            error!("Build sequence failed: {}", e);
            eprintln!("Error: {}", e);
            (None, e.exit_code())
        }
    };

    if let (Some(report), Some(format)) = (report, args.summary.output_format()) {
        match OutputFormatter::new(format).format_report(&report) {
            Ok(summary) => eprintln!("{}", summary),
            Err(e) => error!("Failed to format summary: {:#}", e),
        }
    }

    exit_code
}

pub fn handle_plan(args: &PlanArgs, config: &BuildchainConfig) -> i32 {
    let project = match resolve_project_path(args.project_path.clone()) {
        Ok(path) => path,
        Err(code) => return code,
    };

    let orchestrator =
        BuildOrchestrator::new(config, &project, ProcessRunner::new(), Separator::Disabled);

    match OutputFormatter::new(args.format.into()).format_plan(config, orchestrator.stages()) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Picks the separator once CLI overrides are folded into `config`.
///
/// `--no-separator` and `--separator-lines` already set `config.separator`,
/// so a fixed line count only applies when separation is enabled.
pub fn select_separator(config: &BuildchainConfig, separator_lines: Option<u16>) -> Separator {
    if !config.separator {
        return Separator::Disabled;
    }

    match separator_lines {
        Some(lines) => Separator::Fixed(lines),
        None => Separator::Terminal,
    }
}

fn resolve_project_path(path: Option<PathBuf>) -> Result<PathBuf, i32> {
    let path = match path {
        Some(path) => path,
        None => env::current_dir().map_err(|e| {
            eprintln!("Error: cannot determine current directory: {}", e);
            EXIT_CONFIG_ERROR
        })?,
    };

    if !path.is_dir() {
        eprintln!("Error: project path is not a directory: {}", path.display());
        return Err(EXIT_CONFIG_ERROR);
    }

    Ok(path)
}
