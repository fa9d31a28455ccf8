mod step;

pub use step::{Action, Invocation, Step};

use crate::config::{Config, GeneratorConfig};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const GIT: &str = "git";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Cogs,
    Daily,
    Labor,
    ProductMix,
}

impl std::fmt::Display for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dashboard::Cogs => write!(f, "cogs"),
            Dashboard::Daily => write!(f, "daily"),
            Dashboard::Labor => write!(f, "labor"),
            Dashboard::ProductMix => write!(f, "product-mix"),
        }
    }
}

/// Switches for the optional parts of a plan. All on by default.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub open: bool,
    pub email: bool,
    pub publish: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            open: true,
            email: true,
            publish: true,
        }
    }
}

/// The fixed, ordered list of steps for one dashboard refresh.
#[derive(Debug, Clone)]
pub struct Plan {
    pub dashboard: Dashboard,
    pub period: Option<String>,
    pub steps: Vec<Step>,
}

impl Plan {
    /// Regenerate the COGS dashboard and open it.
    ///
    /// `period` is forwarded to the generator exactly as given; without it
    /// the generator gets no extra argument and reports the current period.
    pub fn refresh_cogs(config: &Config, period: Option<String>, opts: PlanOptions) -> Self {
        let extra: Vec<String> = period.iter().cloned().collect();
        let mut plan = Self::generate_and_open(
            Dashboard::Cogs,
            "generate COGS dashboard",
            config,
            &config.cogs,
            &extra,
            opts,
        );
        plan.period = period;
        plan
    }

    /// Regenerate the weekly labor dashboard and open it.
    pub fn refresh_labor(config: &Config, opts: PlanOptions) -> Self {
        Self::generate_and_open(
            Dashboard::Labor,
            "generate labor dashboard",
            config,
            &config.labor,
            &[],
            opts,
        )
    }

    /// Regenerate the product mix analysis and open it. `debug` asks the
    /// generator to print sample POS selections.
    pub fn refresh_product_mix(config: &Config, debug: bool, opts: PlanOptions) -> Self {
        let extra = if debug {
            vec!["--debug".to_string()]
        } else {
            Vec::new()
        };
        Self::generate_and_open(
            Dashboard::ProductMix,
            "generate product mix analysis",
            config,
            &config.product_mix,
            &extra,
            opts,
        )
    }

    fn generate_and_open(
        dashboard: Dashboard,
        label: &str,
        config: &Config,
        generator: &GeneratorConfig,
        extra_args: &[String],
        opts: PlanOptions,
    ) -> Self {
        let mut args = vec![generator.script.clone()];
        args.extend_from_slice(extra_args);

        let mut steps = vec![Step::new(
            label,
            Action::Run(Invocation::new(&config.interpreter, args, &config.workdir())),
        )];

        if opts.open {
            steps.push(Step::new(
                "open report",
                Action::Open(config.report_path(generator)),
            ));
        }

        Self {
            dashboard,
            period: None,
            steps,
        }
    }

    /// Regenerate the daily sales dashboard, email it, publish the copy to
    /// the publishing repository and open the local report.
    pub fn daily(config: &Config, opts: PlanOptions, today: NaiveDate) -> Self {
        let workdir = config.workdir();
        let report = config.daily_report_path();

        let mut steps = vec![Step::new(
            "generate daily dashboard",
            Action::Run(Invocation::new(
                &config.interpreter,
                [config.daily.script.as_str()],
                &workdir,
            )),
        )];

        if opts.email && config.daily.email {
            steps.push(Step::new(
                "email dashboard",
                Action::Run(Invocation::new(
                    &config.interpreter,
                    [config.daily.email_script.as_str()],
                    &workdir,
                )),
            ));
        }

        match config.publish_dir() {
            Some(publish_dir) if opts.publish => {
                steps.extend(publish_steps(config, &report, publish_dir, today));
            }
            None if opts.publish => {
                tracing::warn!("no publish directory configured, skipping publish");
            }
            _ => {}
        }

        if opts.open {
            steps.push(Step::new("open report", Action::Open(report)));
        }

        Self {
            dashboard: Dashboard::Daily,
            period: None,
            steps,
        }
    }

    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        self.steps.iter().filter_map(|step| match &step.action {
            Action::Run(inv) => Some(inv),
            _ => None,
        })
    }
}

fn publish_steps(
    config: &Config,
    report: &std::path::Path,
    publish_dir: PathBuf,
    today: NaiveDate,
) -> Vec<Step> {
    let file_name = config.publish_file_name().to_string();

    let mut push_args = vec!["push".to_string(), config.publish.remote.clone()];
    push_args.extend(config.publish.branch.clone());

    vec![
        Step::new(
            "copy to publish directory",
            Action::Copy {
                from: report.to_path_buf(),
                to: publish_dir.join(&file_name),
            },
        ),
        Step::new(
            "stage published report",
            Action::Run(Invocation::new(
                GIT,
                ["add", file_name.as_str()],
                &publish_dir,
            )),
        ),
        Step::new(
            "commit published report",
            Action::Commit {
                repo: publish_dir.clone(),
                path: PathBuf::from(&file_name),
                message: config.commit_message(today),
            },
        ),
        Step::new(
            "push published report",
            Action::Run(Invocation::new(GIT, push_args, &publish_dir)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config() -> Config {
        let mut config = Config::default().with_base_dir(Path::new("/data"));
        config.publish.dir = Some(PathBuf::from("/site"));
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    fn labels(plan: &Plan) -> Vec<&str> {
        plan.steps.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_cogs_without_period_passes_no_extra_argument() {
        let plan = Plan::refresh_cogs(&test_config(), None, PlanOptions::default());

        let inv = plan.invocations().next().unwrap();
        assert_eq!(inv.program, "python");
        assert_eq!(inv.args, vec!["cogs_dashboard.py"]);
        assert_eq!(inv.cwd, Path::new("/data"));
        assert!(plan.period.is_none());
    }

    #[test]
    fn test_cogs_period_forwarded_verbatim() {
        for token in ["P2", "p11", " P3 ", "FY2026-P1"] {
            let plan = Plan::refresh_cogs(
                &test_config(),
                Some(token.to_string()),
                PlanOptions::default(),
            );
            let inv = plan.invocations().next().unwrap();
            assert_eq!(inv.args, vec!["cogs_dashboard.py".to_string(), token.to_string()]);
        }
    }

    #[test]
    fn test_cogs_sequence() {
        let plan = Plan::refresh_cogs(&test_config(), Some("P2".into()), PlanOptions::default());
        assert_eq!(labels(&plan), vec!["generate COGS dashboard", "open report"]);
        assert_eq!(
            plan.steps[1].action,
            Action::Open(PathBuf::from("/data/cogs_dashboard.html"))
        );
    }

    #[test]
    fn test_cogs_no_open() {
        let opts = PlanOptions {
            open: false,
            ..PlanOptions::default()
        };
        let plan = Plan::refresh_cogs(&test_config(), None, opts);
        assert_eq!(labels(&plan), vec!["generate COGS dashboard"]);
    }

    #[test]
    fn test_daily_sequence() {
        let plan = Plan::daily(&test_config(), PlanOptions::default(), today());

        assert_eq!(
            labels(&plan),
            vec![
                "generate daily dashboard",
                "email dashboard",
                "copy to publish directory",
                "stage published report",
                "commit published report",
                "push published report",
                "open report",
            ]
        );

        let command_lines: Vec<String> = plan.invocations().map(|i| i.command_line()).collect();
        assert_eq!(
            command_lines,
            vec![
                "python daily_dashboard.py",
                "python email_dashboard.py",
                "git add daily_dashboard.html",
                "git push origin",
            ]
        );
    }

    #[test]
    fn test_daily_generator_gets_no_arguments() {
        let plan = Plan::daily(&test_config(), PlanOptions::default(), today());
        let inv = plan.invocations().next().unwrap();
        assert_eq!(inv.args, vec!["daily_dashboard.py"]);
    }

    #[test]
    fn test_daily_publish_paths_and_message() {
        let mut config = test_config();
        config.publish.file_name = Some("index.html".to_string());
        config.publish.branch = Some("main".to_string());
        let plan = Plan::daily(&config, PlanOptions::default(), today());

        assert_eq!(
            plan.steps[2].action,
            Action::Copy {
                from: PathBuf::from("/data/daily_dashboard.html"),
                to: PathBuf::from("/site/index.html"),
            }
        );
        assert_eq!(
            plan.steps[4].action,
            Action::Commit {
                repo: PathBuf::from("/site"),
                path: PathBuf::from("index.html"),
                message: "Update daily dashboard 2026-03-04".to_string(),
            }
        );
        let push = plan.invocations().last().unwrap();
        assert_eq!(push.args, vec!["push", "origin", "main"]);
        assert_eq!(push.cwd, Path::new("/site"));
    }

    #[test]
    fn test_daily_without_publish_dir_skips_publish() {
        let config = Config::default().with_base_dir(Path::new("/data"));
        let plan = Plan::daily(&config, PlanOptions::default(), today());
        assert_eq!(
            labels(&plan),
            vec!["generate daily dashboard", "email dashboard", "open report"]
        );
    }

    #[test]
    fn test_daily_option_switches() {
        let opts = PlanOptions {
            open: false,
            email: false,
            publish: false,
        };
        let plan = Plan::daily(&test_config(), opts, today());
        assert_eq!(labels(&plan), vec!["generate daily dashboard"]);
    }

    #[test]
    fn test_daily_email_disabled_in_config() {
        let mut config = test_config();
        config.daily.email = false;
        let plan = Plan::daily(&config, PlanOptions::default(), today());
        assert!(!labels(&plan).contains(&"email dashboard"));
    }

    #[test]
    fn test_labor_sequence() {
        let plan = Plan::refresh_labor(&test_config(), PlanOptions::default());

        assert_eq!(plan.dashboard, Dashboard::Labor);
        assert_eq!(labels(&plan), vec!["generate labor dashboard", "open report"]);
        let inv = plan.invocations().next().unwrap();
        assert_eq!(inv.command_line(), "python labor_dashboard.py");
        assert_eq!(inv.cwd, Path::new("/data"));
        assert_eq!(
            plan.steps[1].action,
            Action::Open(PathBuf::from("/data/labor_dashboard.html"))
        );
    }

    #[test]
    fn test_product_mix_debug_flag() {
        let plan = Plan::refresh_product_mix(&test_config(), false, PlanOptions::default());
        assert_eq!(
            plan.invocations().next().unwrap().args,
            vec!["product_mix_analysis.py"]
        );
        assert_eq!(
            plan.steps[1].action,
            Action::Open(PathBuf::from("/data/product_mix_analysis.html"))
        );

        let plan = Plan::refresh_product_mix(&test_config(), true, PlanOptions::default());
        assert_eq!(
            plan.invocations().next().unwrap().args,
            vec!["product_mix_analysis.py", "--debug"]
        );
    }

    #[test]
    fn test_generator_report_override() {
        let mut config = test_config();
        config.labor.report = Some("labor.html".to_string());
        let plan = Plan::refresh_labor(&config, PlanOptions::default());
        assert_eq!(
            plan.steps[1].action,
            Action::Open(PathBuf::from("/data/labor.html"))
        );
    }

    #[test]
    fn test_dashboard_serialization() {
        assert_eq!(
            serde_json::to_string(&Dashboard::ProductMix).unwrap(),
            r#""product_mix""#
        );
        assert_eq!(serde_json::to_string(&Dashboard::Cogs).unwrap(), r#""cogs""#);
    }
}
