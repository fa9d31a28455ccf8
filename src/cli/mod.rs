pub mod cogs;
pub mod config;
pub mod daily;
pub mod history;
pub mod labor;
pub mod product_mix;

use crate::config::Config;
use crate::history::History;
use crate::plan::Plan;
use crate::runner::{Executor, FailurePolicy, RunReport, Runner, StepOutcome, SystemExecutor};
use crate::Result;
use colored::Colorize;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "STEP")]
    label: String,
    #[tabled(rename = "RESULT")]
    outcome: String,
}

fn colored_outcome(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Succeeded => outcome.to_string().green().to_string(),
        StepOutcome::Skipped(_) => outcome.to_string().yellow().to_string(),
        StepOutcome::Failed(_) => outcome.to_string().red().to_string(),
        StepOutcome::NotRun => outcome.to_string().dimmed().to_string(),
    }
}

fn print_plan(plan: &Plan) {
    println!("Plan for {} dashboard:", plan.dashboard);
    for (i, step) in plan.steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}

fn print_summary(report: &RunReport) {
    let rows: Vec<StepRow> = report
        .steps
        .iter()
        .map(|s| StepRow {
            label: s.label.clone(),
            outcome: colored_outcome(&s.outcome),
        })
        .collect();

    println!();
    println!("{}", Table::new(rows));
}

/// Run a plan with the real executor, print the outcome and record it.
/// With `dry_run` the plan is only printed.
pub(crate) fn execute(
    config: &Config,
    plan: &Plan,
    policy: FailurePolicy,
    dry_run: bool,
) -> Result<()> {
    execute_with(SystemExecutor, config, plan, policy, dry_run)
}

pub(crate) fn execute_with<E: Executor>(
    executor: E,
    config: &Config,
    plan: &Plan,
    policy: FailurePolicy,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        print_plan(plan);
        return Ok(());
    }

    let mut runner = Runner::new(executor, policy);
    let report = runner.execute(plan);
    print_summary(&report);

    // A broken history file must not hide the run's own result.
    match History::load_or_create(&config.state_dir()).and_then(|mut h| h.record(&report)) {
        Ok(id) => tracing::debug!(id, "recorded run"),
        Err(e) => eprintln!("Warning: could not record run history: {e}"),
    }

    report.into_result()?;
    Ok(())
}
