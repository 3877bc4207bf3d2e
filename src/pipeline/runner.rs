//! Process execution seam
//!
//! The orchestrator never touches `std::process` directly. It hands each
//! [`StageSpec`] to a [`CommandRunner`], which blocks until the stage exits.
//! [`ProcessRunner`] is the real implementation; tests substitute a recorder.

use super::stage::StageSpec;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;
use tracing::debug;

/// Exit code the host shell reports for a command it cannot start
pub const SPAWN_FAILURE_CODE: i32 = 127;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Completion status of a finished stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    pub code: i32,
}

impl StageOutcome {
    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl From<ExitStatus> for StageOutcome {
    fn from(status: ExitStatus) -> Self {
        Self::new(exit_code(status))
    }
}

/// Maps an exit status to the integer a shell would report.
///
/// Signal terminations become `128 + signal` on unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Runs a stage to completion
pub trait CommandRunner {
    fn run(&mut self, spec: &StageSpec) -> Result<StageOutcome, RunnerError>;
}

/// Spawns the stage as a child process with inherited stdio
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, spec: &StageSpec) -> Result<StageOutcome, RunnerError> {
        debug!(
            stage = %spec.stage,
            dir = %spec.working_dir.display(),
            "Spawning {}",
            spec.command_line()
        );

        let status = spec
            .command()
            .status()
            .map_err(|source| RunnerError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        Ok(StageOutcome::from(status))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::pipeline::stage::Stage;
    use std::path::Path;

    fn spec_for(program: &str) -> StageSpec {
        StageSpec::new(Stage::Debug, program, "full", Path::new("."))
    }

    #[test]
    fn test_process_runner_reports_exit_code() {
        let mut runner = ProcessRunner::new();
        let outcome = runner.run(&spec_for("false")).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.code, 1);
    }

    #[test]
    fn test_process_runner_success() {
        let mut runner = ProcessRunner::new();
        let outcome = runner.run(&spec_for("true")).unwrap();
        assert!(outcome.success());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut runner = ProcessRunner::new();
        let err = runner
            .run(&spec_for("buildchain-no-such-program"))
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { ref program, .. } if program == "buildchain-no-such-program"));
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn test_signal_exit_code() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status for SIGKILL
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code(status), 137);
    }
}
