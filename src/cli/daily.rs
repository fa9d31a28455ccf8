use crate::config::Config;
use crate::git;
use crate::plan::{Plan, PlanOptions};
use crate::runner::{Executor, FailurePolicy, SystemExecutor};
use crate::Result;
use chrono::NaiveDate;

pub async fn run(
    config: &Config,
    opts: PlanOptions,
    policy: FailurePolicy,
    dry_run: bool,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    run_with(SystemExecutor, config, opts, policy, dry_run, today)
}

fn run_with<E: Executor>(
    executor: E,
    config: &Config,
    opts: PlanOptions,
    policy: FailurePolicy,
    dry_run: bool,
    today: NaiveDate,
) -> Result<()> {
    // Catch a misconfigured publish directory before the generator spends
    // minutes pulling data.
    if opts.publish && !dry_run {
        if let Some(publish_dir) = config.publish_dir() {
            let root = git::discover_root(&publish_dir)?;
            tracing::debug!(root = %root.display(), "publishing repository");
        }
    }

    let plan = Plan::daily(config, opts, today);

    println!("Refreshing daily sales dashboard");
    super::execute_with(executor, config, &plan, policy, dry_run)
}
