//! Record of a pipeline run

use super::stage::Stage;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub stage: Stage,
    pub command: String,
    pub code: i32,
    /// Non-zero exit that did not stop the pipeline
    pub ignored_failure: bool,
}

impl StageResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Stages that ran, in order, and the exit code the process should use
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub stages: Vec<StageResult>,
    pub exit_code: i32,
    pub aborted: bool,
}

impl RunReport {
    pub fn push(&mut self, result: StageResult) {
        self.stages.push(result);
    }

    pub fn ran(&self, stage: Stage) -> bool {
        self.stages.iter().any(|r| r.stage == stage)
    }

    pub fn result(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    pub fn order(&self) -> Vec<Stage> {
        self.stages.iter().map(|r| r.stage).collect()
    }
}
