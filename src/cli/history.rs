use crate::config::Config;
use crate::history::{History, RunRecord};
use crate::Result;
use colored::Colorize;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "DASHBOARD")]
    dashboard: String,
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "STARTED")]
    started: String,
    #[tabled(rename = "DURATION")]
    duration: String,
    #[tabled(rename = "RESULT")]
    result: String,
}

impl From<&RunRecord> for RunRow {
    fn from(run: &RunRecord) -> Self {
        let seconds = (run.finished_at - run.started_at).num_seconds();
        let result = if run.success {
            "ok".green().to_string()
        } else {
            let failed = run
                .steps
                .iter()
                .find(|s| s.outcome.is_failure())
                .map(|s| s.label.as_str())
                .unwrap_or("unknown step");
            format!("failed: {failed}").red().to_string()
        };

        Self {
            id: run.id,
            dashboard: run.dashboard.to_string(),
            period: run.period.clone().unwrap_or_else(|| "current".to_string()),
            started: run
                .started_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            duration: format!("{seconds}s"),
            result,
        }
    }
}

pub async fn run(config: &Config, limit: usize) -> Result<()> {
    let history = History::load_or_create(&config.state_dir())?;

    let rows: Vec<RunRow> = history.recent(limit).map(RunRow::from).collect();
    if rows.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }

    println!("{}", Table::new(rows));
    Ok(())
}
