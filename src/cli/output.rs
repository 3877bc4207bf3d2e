//! Output formatting for plans and run summaries
//!
//! Supports JSON, YAML and human-readable text.

use anyhow::{Context, Result};

use crate::config::BuildchainConfig;
use crate::pipeline::{RunReport, StageSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the stage list `run` would execute
    pub fn format_plan(&self, config: &BuildchainConfig, stages: &[StageSpec]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "config": config.to_display_map(),
                    "stages": stages,
                });
                serde_json::to_string_pretty(&output).context("Failed to serialize plan to JSON")
            }
            OutputFormat::Yaml => {
                let output = serde_json::json!({
                    "config": config.to_display_map(),
                    "stages": stages,
                });
                serde_yaml::to_string(&output).context("Failed to serialize plan to YAML")
            }
            OutputFormat::Human => Ok(self.format_plan_human(config, stages)),
        }
    }

    /// Formats the result of a run
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    fn format_plan_human(&self, config: &BuildchainConfig, stages: &[StageSpec]) -> String {
        let mut output = String::new();
        output.push_str(&config.to_string());
        output.push('\n');

        if let Some(first) = stages.first() {
            output.push_str(&format!("Project: {}\n\n", first.working_dir.display()));
        }

        output.push_str("Stages:\n");
        for (i, spec) in stages.iter().enumerate() {
            let connector = if i + 1 == stages.len() {
                "\u{2514}\u{2500}"
            } else {
                "\u{251C}\u{2500}"
            };
            let note = if spec.stage.fatal() {
                "stops on failure"
            } else {
                "failure ignored"
            };
            output.push_str(&format!(
                "{} {:<8} {}  ({})\n",
                connector,
                spec.stage.name(),
                spec.command_line(),
                note
            ));
        }

        output
    }

    fn format_report_human(&self, report: &RunReport) -> String {
        let mut output = String::new();

        if report.aborted {
            output.push_str("\u{2717} Build aborted\n");
        } else {
            output.push_str("\u{2713} Build sequence finished\n");
        }

        for result in &report.stages {
            let mark = if result.success() {
                "\u{2713}"
            } else if result.ignored_failure {
                "\u{26A0}"
            } else {
                "\u{2717}"
            };
            output.push_str(&format!(
                "  {} {:<8} exit {}\n",
                mark,
                result.stage.name(),
                result.code
            ));
        }

        output.push_str(&format!("Exit code: {}\n", report.exit_code));
        output
    }
}
