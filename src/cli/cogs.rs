use crate::config::Config;
use crate::plan::{Plan, PlanOptions};
use crate::runner::FailurePolicy;
use crate::Result;

pub async fn run(
    config: &Config,
    period: Option<String>,
    open: bool,
    policy: FailurePolicy,
    dry_run: bool,
) -> Result<()> {
    match &period {
        Some(p) => println!("Refreshing COGS dashboard for {p}"),
        None => println!("Refreshing COGS dashboard for the current period"),
    }

    let opts = PlanOptions {
        open,
        ..PlanOptions::default()
    };
    let plan = Plan::refresh_cogs(config, period, opts);

    super::execute(config, &plan, policy, dry_run)
}
