use crate::error::{Error, Result};
use crate::plan::Dashboard;
use crate::runner::{RunReport, StepReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const HISTORY_FILE: &str = "history.json";
const MAX_RUNS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub dashboard: Dashboard,
    pub period: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
    pub success: bool,
}

/// Launcher runs, oldest first, persisted as JSON in the state directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct History {
    #[serde(skip)]
    state_dir: PathBuf,
    next_id: u64,
    runs: Vec<RunRecord>,
}

impl History {
    pub fn load_or_create(state_dir: &Path) -> Result<Self> {
        let history_file = state_dir.join(HISTORY_FILE);

        if history_file.exists() {
            let content = std::fs::read_to_string(&history_file)?;
            let mut history: History = serde_json::from_str(&content)
                .map_err(|e| Error::HistoryCorrupted(e.to_string()))?;
            history.state_dir = state_dir.to_path_buf();
            Ok(history)
        } else {
            Ok(Self {
                state_dir: state_dir.to_path_buf(),
                next_id: 1,
                runs: Vec::new(),
            })
        }
    }

    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir)?;
        let history_file = self.state_dir.join(HISTORY_FILE);
        let content = serde_json::to_string_pretty(&self)?;
        std::fs::write(history_file, content)?;
        Ok(())
    }

    /// Append a finished run and save, dropping the oldest runs past the
    /// retention limit.
    pub fn record(&mut self, report: &RunReport) -> Result<u64> {
        let id = self.next_id;
        self.next_id += 1;

        self.runs.push(RunRecord {
            id,
            dashboard: report.dashboard,
            period: report.period.clone(),
            started_at: report.started_at,
            finished_at: report.finished_at,
            steps: report.steps.clone(),
            success: report.success(),
        });

        if self.runs.len() > MAX_RUNS {
            let excess = self.runs.len() - MAX_RUNS;
            self.runs.drain(..excess);
        }

        self.save()?;
        Ok(id)
    }

    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Up to `limit` runs, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &RunRecord> {
        self.runs.iter().rev().take(limit)
    }
}
