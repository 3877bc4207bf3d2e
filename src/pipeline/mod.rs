//! Build pipeline: stage model, process runner, separator and orchestrator

pub mod orchestrator;
pub mod report;
pub mod runner;
pub mod separator;
pub mod stage;

pub use orchestrator::{BuildOrchestrator, OrchestratorError};
pub use report::{RunReport, StageResult};
pub use runner::{CommandRunner, ProcessRunner, RunnerError, StageOutcome};
pub use separator::Separator;
pub use stage::{Stage, StageSpec};
