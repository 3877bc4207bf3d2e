//! Stage model for the build pipeline
//!
//! A [`StageSpec`] fully describes one toolchain invocation: which program to
//! run, with which arguments and extra environment, in which directory. The
//! orchestrator builds the three specs up front so the same list can be
//! printed by `buildchain plan` and executed by `buildchain run`.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable the debug build receives for backtrace diagnostics
pub const BACKTRACE_ENV: &str = "RUST_BACKTRACE";

/// The three stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Automatic source remediation (`cargo fix`)
    Fix,
    /// Unoptimized build (`cargo build`)
    Debug,
    /// Optimized build (`cargo build --release`)
    Release,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Fix, Stage::Debug, Stage::Release];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Fix => "fix",
            Stage::Debug => "debug",
            Stage::Release => "release",
        }
    }

    /// Whether a non-zero exit from this stage aborts the pipeline.
    ///
    /// Only the debug build is checked. Fix and release statuses are logged
    /// and otherwise ignored.
    pub fn fatal(&self) -> bool {
        matches!(self, Stage::Debug)
    }

    /// Toolchain arguments for this stage
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            Stage::Fix => &["fix", "--all-features", "--allow-dirty", "--allow-staged"],
            Stage::Debug => &["build"],
            Stage::Release => &["build", "--release"],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single toolchain invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSpec {
    pub stage: Stage,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub working_dir: PathBuf,
}

impl StageSpec {
    /// Creates the spec for `stage` using `program` as the toolchain driver.
    ///
    /// The debug stage gets `RUST_BACKTRACE=<backtrace>` added to its
    /// environment.
    pub fn new(stage: Stage, program: &str, backtrace: &str, working_dir: &Path) -> Self {
        let env = match stage {
            Stage::Debug => vec![(BACKTRACE_ENV.to_string(), backtrace.to_string())],
            Stage::Fix | Stage::Release => Vec::new(),
        };

        Self {
            stage,
            program: program.to_string(),
            args: stage.args().iter().map(|a| a.to_string()).collect(),
            env,
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Builds the process command. Stdio is inherited.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Shell-like rendering used in logs and `plan` output
    pub fn command_line(&self) -> String {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        fix = { Stage::Fix, "cargo fix --all-features --allow-dirty --allow-staged" },
        debug = { Stage::Debug, "RUST_BACKTRACE=full cargo build" },
        release = { Stage::Release, "cargo build --release" },
    )]
    fn test_command_line(stage: Stage, expected: &str) {
        let spec = StageSpec::new(stage, "cargo", "full", Path::new("."));
        assert_eq!(spec.command_line(), expected);
    }

    #[test]
    fn test_only_debug_is_fatal() {
        assert!(!Stage::Fix.fatal());
        assert!(Stage::Debug.fatal());
        assert!(!Stage::Release.fatal());
    }

    #[test]
    fn test_backtrace_only_on_debug() {
        let dir = Path::new("/tmp/project");
        for stage in Stage::ALL {
            let spec = StageSpec::new(stage, "cargo", "1", dir);
            let has_backtrace = spec.env.iter().any(|(k, v)| k == BACKTRACE_ENV && v == "1");
            assert_eq!(has_backtrace, stage == Stage::Debug, "stage {}", stage);
        }
    }

    #[test]
    fn test_command_sets_working_dir() {
        let spec = StageSpec::new(Stage::Release, "cargo", "full", Path::new("/tmp/project"));
        let cmd = spec.command();
        assert_eq!(cmd.get_program(), "cargo");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp/project")));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["build", "--release"]);
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        let json = serde_json::to_string(&Stage::Release).unwrap();
        assert_eq!(json, "\"release\"");
    }
}
