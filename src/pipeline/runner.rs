//! Sequential matrix-cell execution.
//!
//! # Responsibilities
//! - Run install, then test, then publish command lists for each cell
//! - Export the cell and the static env map to every command
//! - Stop a cell on its first failing command
//! - Gate publishing on green tests and a present credential
//!
//! # Design Decisions
//! - One sequential script per cell; cells run one after another. There
//!   is deliberately no retry, backpressure, or partial-failure recovery:
//!   a non-zero exit ends the cell, full stop
//! - A failing cell does not abort the other cells; the summary carries
//!   every outcome and the caller decides the process exit code
//! - Commands run through the configured shell (`sh -c`) so step lists
//!   read like the scripts they replace

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::schema::PipelineConfig;
use crate::lifecycle::Cancellation;
use crate::pipeline::matrix::{expand, Cell};
use crate::pipeline::report::{
    CellOutcome, CellReport, PublishStatus, RunSummary, StepKind, StepRecord, StepStatus,
};

/// Errors that abort a run outright (not step failures).
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn '{command}' via shell '{shell}': {source}")]
    Spawn {
        shell: String,
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executes a pipeline configuration cell by cell.
pub struct PipelineRunner {
    config: PipelineConfig,
    cancel: Cancellation,
}

impl PipelineRunner {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: Cancellation::new(),
        }
    }

    pub fn with_cancellation(config: PipelineConfig, cancel: Cancellation) -> Self {
        Self { config, cancel }
    }

    /// Handle used to abort the run from another task.
    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    /// Run every cell of the matrix and collect the summary.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let run_id = Uuid::new_v4();
        let cells = expand(&self.config.matrix);
        info!(%run_id, cells = cells.len(), "pipeline run starting");

        let mut reports = Vec::with_capacity(cells.len());
        for cell in cells {
            if self.cancel.is_cancelled() {
                warn!(%cell, "run cancelled, skipping cell");
                reports.push(CellReport::skipped(cell));
                continue;
            }
            reports.push(self.run_cell(cell).await?);
        }

        let summary = RunSummary::new(run_id, reports);
        info!(
            %run_id,
            passed = summary.passed(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "pipeline run finished"
        );
        Ok(summary)
    }

    async fn run_cell(&self, cell: Cell) -> Result<CellReport, RunnerError> {
        info!(%cell, "cell starting");
        let env = self.cell_env(&cell);
        let mut steps = Vec::new();

        let lists = [
            (StepKind::Install, &self.config.install),
            (StepKind::Test, &self.config.test),
        ];
        for (kind, commands) in lists {
            for command in commands {
                let status = self.run_command(command, &env).await?;
                let done = status != StepStatus::Passed;
                steps.push(StepRecord {
                    kind,
                    command: command.clone(),
                    status: status.clone(),
                });
                if done {
                    warn!(%cell, step = %kind, command, "cell stopped at first failing command");
                    let outcome = match status {
                        StepStatus::Cancelled => CellOutcome::Cancelled,
                        _ => CellOutcome::Failed,
                    };
                    return Ok(CellReport {
                        cell,
                        steps,
                        publish: PublishStatus::NotReached,
                        outcome,
                    });
                }
            }
        }

        // Tests are green; publishing is gated on the credential.
        let publish = self.publish_status();
        let mut outcome = CellOutcome::Passed;
        if publish == PublishStatus::Ran {
            for command in &self.config.publish.commands {
                let status = self.run_command(command, &env).await?;
                let done = status != StepStatus::Passed;
                steps.push(StepRecord {
                    kind: StepKind::Publish,
                    command: command.clone(),
                    status: status.clone(),
                });
                if done {
                    outcome = match status {
                        StepStatus::Cancelled => CellOutcome::Cancelled,
                        _ => CellOutcome::Failed,
                    };
                    break;
                }
            }
        }

        info!(%cell, ?outcome, ?publish, "cell finished");
        Ok(CellReport {
            cell,
            steps,
            publish,
            outcome,
        })
    }

    fn publish_status(&self) -> PublishStatus {
        if self.config.publish.commands.is_empty() {
            return PublishStatus::NotConfigured;
        }
        match std::env::var(&self.config.publish.token_var) {
            Ok(token) if !token.is_empty() => PublishStatus::Ran,
            _ => {
                info!(
                    token_var = %self.config.publish.token_var,
                    "credential absent, publish skipped"
                );
                PublishStatus::SkippedMissingToken
            }
        }
    }

    fn cell_env(&self, cell: &Cell) -> BTreeMap<String, String> {
        let mut env = self.config.env.clone();
        env.insert(self.config.os_var.clone(), cell.os.clone());
        env.insert(self.config.runtime_var.clone(), cell.runtime.clone());
        env
    }

    async fn run_command(
        &self,
        command: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<StepStatus, RunnerError> {
        debug!(command, "step starting");
        let mut child = Command::new(&self.config.shell)
            .arg("-c")
            .arg(command)
            .envs(env)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                shell: self.config.shell.clone(),
                command: command.to_string(),
                source,
            })?;

        let mut cancelled = self.cancel.subscribe();
        let status = tokio::select! {
            status = child.wait() => status,
            _ = cancelled.recv() => {
                warn!(command, "step cancelled, killing child");
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Ok(StepStatus::Cancelled);
            }
        };

        let status = status.map_err(|source| RunnerError::Spawn {
            shell: self.config.shell.clone(),
            command: command.to_string(),
            source,
        })?;

        if status.success() {
            debug!(command, "step passed");
            Ok(StepStatus::Passed)
        } else {
            Ok(StepStatus::Failed {
                exit_code: status.code(),
            })
        }
    }
}
