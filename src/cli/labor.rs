use crate::config::Config;
use crate::plan::{Plan, PlanOptions};
use crate::runner::FailurePolicy;
use crate::Result;

pub async fn run(config: &Config, open: bool, policy: FailurePolicy, dry_run: bool) -> Result<()> {
    println!("Refreshing labor dashboard");

    let opts = PlanOptions {
        open,
        ..PlanOptions::default()
    };
    let plan = Plan::refresh_labor(config, opts);

    super::execute(config, &plan, policy, dry_run)
}
