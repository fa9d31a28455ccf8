use crate::config::Config;
use crate::plan::{Plan, PlanOptions};
use crate::runner::FailurePolicy;
use crate::Result;

pub async fn run(
    config: &Config,
    debug: bool,
    open: bool,
    policy: FailurePolicy,
    dry_run: bool,
) -> Result<()> {
    println!("Refreshing product mix analysis");

    let opts = PlanOptions {
        open,
        ..PlanOptions::default()
    };
    let plan = Plan::refresh_product_mix(config, debug, opts);

    super::execute(config, &plan, policy, dry_run)
}
