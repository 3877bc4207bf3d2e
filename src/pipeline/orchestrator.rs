//! Sequential build orchestration
//!
//! Runs auto-fix, debug build and release build in that order. Only the
//! debug build is checked: a non-zero exit stops the pipeline before the
//! release build and becomes the process exit code. Fix and release failures
//! are logged and ignored.

use super::report::{RunReport, StageResult};
use super::runner::{CommandRunner, StageOutcome, SPAWN_FAILURE_CODE};
use super::separator::Separator;
use super::stage::{Stage, StageSpec};
use crate::config::BuildchainConfig;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("debug build failed with exit code {code}; release build skipped")]
    BuildFailed { code: i32, report: RunReport },

    #[error("failed to write stage separator: {0}")]
    Io(#[from] io::Error),
}

impl OrchestratorError {
    /// Exit code the process should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::BuildFailed { code, .. } => *code,
            OrchestratorError::Io(_) => 1,
        }
    }
}

pub struct BuildOrchestrator<R: CommandRunner> {
    stages: Vec<StageSpec>,
    runner: R,
    separator: Separator,
}

impl<R: CommandRunner> BuildOrchestrator<R> {
    pub fn new(
        config: &BuildchainConfig,
        working_dir: &Path,
        runner: R,
        separator: Separator,
    ) -> Self {
        let stages = Stage::ALL
            .iter()
            .map(|stage| StageSpec::new(*stage, &config.program, &config.backtrace, working_dir))
            .collect();

        Self {
            stages,
            runner,
            separator,
        }
    }

    /// The stages `run` executes, in order
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    #[cfg(test)]
    pub(crate) fn into_runner(self) -> R {
        self.runner
    }

    /// Runs every stage, writing separators between them to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunReport, OrchestratorError> {
        let mut report = RunReport::default();
        let last = self.stages.len().saturating_sub(1);

        for (index, spec) in self.stages.iter().enumerate() {
            let outcome = run_stage(&mut self.runner, spec);
            let failed = !outcome.success();

            report.push(StageResult {
                stage: spec.stage,
                command: spec.command_line(),
                code: outcome.code,
                ignored_failure: failed && !spec.stage.fatal(),
            });
            report.exit_code = outcome.code;

            if failed && spec.stage.fatal() {
                error!(stage = %spec.stage, code = outcome.code, "Stage failed, aborting");
                report.aborted = true;
                return Err(OrchestratorError::BuildFailed {
                    code: outcome.code,
                    report,
                });
            }

            if failed {
                warn!(stage = %spec.stage, code = outcome.code, "Stage failed, continuing");
            }

            if index < last {
                self.separator.emit(out)?;
            }
        }

        Ok(report)
    }
}

fn run_stage<R: CommandRunner>(runner: &mut R, spec: &StageSpec) -> StageOutcome {
    info!(stage = %spec.stage, program = %spec.program, "Running {}", spec.command_line());

    match runner.run(spec) {
        Ok(outcome) => {
            info!(stage = %spec.stage, code = outcome.code, "Stage finished");
            outcome
        }
        Err(e) => {
            warn!(stage = %spec.stage, error = %e, "Stage could not be started");
            StageOutcome::new(SPAWN_FAILURE_CODE)
        }
    }
}
