mod executor;
#[cfg(test)]
pub(crate) mod testing;

pub use executor::{Executor, Exit, SystemExecutor};

use crate::error::{Error, Result};
use crate::git;
use crate::plan::{Action, Dashboard, Invocation, Plan, Step};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;

const GIT: &str = "git";

/// What to do after a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    FailFast,
    /// Run every step regardless of earlier failures.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum StepOutcome {
    Succeeded,
    Skipped(String),
    Failed(String),
    #[serde(rename = "not_run")]
    NotRun,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Succeeded => write!(f, "ok"),
            StepOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            StepOutcome::Failed(reason) => write!(f, "failed ({reason})"),
            StepOutcome::NotRun => write!(f, "not run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub label: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub dashboard: Dashboard,
    pub period: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_failure()).count()
    }

    pub fn success(&self) -> bool {
        self.failed_count() == 0
    }

    /// `Err(RunFailed)` when any step failed.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed_count();
        if failed > 0 {
            return Err(Error::RunFailed {
                failed,
                total: self.steps.len(),
            });
        }
        Ok(self)
    }
}

/// Runs plan steps one after another, blocking on each.
pub struct Runner<E: Executor> {
    executor: E,
    policy: FailurePolicy,
}

impl<E: Executor> Runner<E> {
    pub fn new(executor: E, policy: FailurePolicy) -> Self {
        Self { executor, policy }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn execute(&mut self, plan: &Plan) -> RunReport {
        let started_at = Utc::now();
        let mut steps = Vec::with_capacity(plan.steps.len());
        let mut stopped = false;

        for step in &plan.steps {
            if stopped {
                steps.push(StepReport {
                    label: step.label.clone(),
                    outcome: StepOutcome::NotRun,
                });
                continue;
            }

            println!("{} {}", "==>".blue().bold(), step.label.bold());
            tracing::info!(step = %step, "running step");

            let outcome = match self.run_step(step) {
                Ok(outcome) => outcome,
                Err(e) => StepOutcome::Failed(e.to_string()),
            };

            match &outcome {
                StepOutcome::Failed(reason) => {
                    tracing::error!(step = %step.label, %reason, "step failed");
                    eprintln!("{} {}: {reason}", "error:".red().bold(), step.label);
                    stopped = self.policy == FailurePolicy::FailFast;
                }
                StepOutcome::Skipped(reason) => {
                    tracing::info!(step = %step.label, %reason, "step skipped");
                }
                _ => tracing::info!(step = %step.label, "step finished"),
            }

            steps.push(StepReport {
                label: step.label.clone(),
                outcome,
            });
        }

        RunReport {
            dashboard: plan.dashboard,
            period: plan.period.clone(),
            started_at,
            finished_at: Utc::now(),
            steps,
        }
    }

    fn run_step(&mut self, step: &Step) -> Result<StepOutcome> {
        match &step.action {
            Action::Run(invocation) => self.run_checked(invocation),
            Action::Copy { from, to } => copy_report(from, to),
            Action::Commit {
                repo,
                path,
                message,
            } => {
                if !git::has_staged_changes(repo, path)? {
                    return Ok(StepOutcome::Skipped("nothing to commit".to_string()));
                }
                let path_arg = path.to_string_lossy().into_owned();
                let commit = Invocation::new(
                    GIT,
                    ["commit", "-m", message.as_str(), "--", path_arg.as_str()],
                    repo,
                );
                self.run_checked(&commit)
            }
            Action::Open(path) => {
                if !path.exists() {
                    return Err(Error::ReportNotFound(path.clone()));
                }
                self.executor.open(path)?;
                Ok(StepOutcome::Succeeded)
            }
        }
    }

    fn run_checked(&mut self, invocation: &Invocation) -> Result<StepOutcome> {
        let exit = self.executor.run(invocation)?;
        if !exit.success() {
            return Err(Error::CommandFailed {
                command: invocation.command_line(),
                code: exit.code,
            });
        }
        Ok(StepOutcome::Succeeded)
    }
}

fn copy_report(from: &Path, to: &Path) -> Result<StepOutcome> {
    if !from.exists() {
        return Err(Error::ReportNotFound(from.to_path_buf()));
    }
    // Copying a file onto itself truncates it.
    if to.exists() && from.canonicalize()? == to.canonicalize()? {
        return Ok(StepOutcome::Skipped(
            "already in publish directory".to_string(),
        ));
    }
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(from, to)?;
    tracing::debug!(from = %from.display(), to = %to.display(), "copied report");
    Ok(StepOutcome::Succeeded)
}
