//! Per-cell and whole-run outcome reporting.

use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::matrix::Cell;

/// Which step list a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Install,
    Test,
    Publish,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepKind::Install => "install",
            StepKind::Test => "test",
            StepKind::Publish => "publish",
        };
        write!(f, "{}", s)
    }
}

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed { exit_code: Option<i32> },
    Cancelled,
}

/// One command that was actually started.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub kind: StepKind,
    pub command: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Why publishing did or did not run for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Publish commands ran (their step records carry pass/fail).
    Ran,
    /// Tests were green but the credential variable was absent or empty.
    SkippedMissingToken,
    /// No publish commands are configured.
    NotConfigured,
    /// The cell never reached a green test list.
    NotReached,
}

/// Final outcome of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellOutcome {
    Passed,
    Failed,
    Cancelled,
    /// Never started (run was cancelled before this cell).
    Skipped,
}

/// Everything that happened in one matrix cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub cell: Cell,
    pub steps: Vec<StepRecord>,
    pub publish: PublishStatus,
    pub outcome: CellOutcome,
}

impl CellReport {
    /// A cell skipped because the run was cancelled before it started.
    pub fn skipped(cell: Cell) -> Self {
        Self {
            cell,
            steps: Vec::new(),
            publish: PublishStatus::NotReached,
            outcome: CellOutcome::Skipped,
        }
    }
}

/// Outcome of a whole pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub cells: Vec<CellReport>,
}

impl RunSummary {
    pub fn new(run_id: Uuid, cells: Vec<CellReport>) -> Self {
        Self { run_id, cells }
    }

    /// True when every cell passed.
    pub fn is_success(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.outcome == CellOutcome::Passed)
    }

    pub fn passed(&self) -> usize {
        self.count(CellOutcome::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(CellOutcome::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(CellOutcome::Skipped) + self.count(CellOutcome::Cancelled)
    }

    fn count(&self, outcome: CellOutcome) -> usize {
        self.cells.iter().filter(|c| c.outcome == outcome).count()
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "run {}: {} passed, {} failed, {} skipped",
            self.run_id,
            self.passed(),
            self.failed(),
            self.skipped()
        )?;
        for report in &self.cells {
            writeln!(f, "  {:<20} {:?}", report.cell.to_string(), report.outcome)?;
        }
        Ok(())
    }
}
