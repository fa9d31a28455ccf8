use clap::{Parser, Subcommand};
use dashctl::cli;
use dashctl::config::Config;
use dashctl::plan::PlanOptions;
use dashctl::runner::FailurePolicy;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "dashctl",
    about = "Refresh, email and publish the COGS and daily sales dashboards"
)]
struct Cli {
    /// Config file (default: ./dashctl.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the COGS dashboard and open it
    RefreshCogs {
        /// Reporting period passed to the generator, e.g. P2 (default: current period)
        #[arg(allow_hyphen_values = true)]
        period: Option<String>,

        /// Don't open the report when done
        #[arg(long)]
        no_open: bool,

        /// Continue with the remaining steps after a failure
        #[arg(long)]
        keep_going: bool,

        /// Print the steps without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Regenerate the labor dashboard and open it
    RefreshLabor {
        /// Don't open the report when done
        #[arg(long)]
        no_open: bool,

        /// Continue with the remaining steps after a failure
        #[arg(long)]
        keep_going: bool,

        /// Print the steps without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Regenerate the product mix analysis and open it
    RefreshProductMix {
        /// Ask the generator to print sample POS selections
        #[arg(long)]
        debug: bool,

        /// Don't open the report when done
        #[arg(long)]
        no_open: bool,

        /// Continue with the remaining steps after a failure
        #[arg(long)]
        keep_going: bool,

        /// Print the steps without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Regenerate the daily sales dashboard, email and publish it
    Daily {
        /// Skip sending the email
        #[arg(long)]
        no_email: bool,

        /// Skip copying and pushing to the publish repository
        #[arg(long)]
        no_publish: bool,

        /// Don't open the report when done
        #[arg(long)]
        no_open: bool,

        /// Continue with the remaining steps after a failure
        #[arg(long)]
        keep_going: bool,

        /// Print the steps without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show previous runs
    History {
        /// Number of runs to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print the effective configuration
    Config {
        /// Write a default config file instead
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn policy(keep_going: bool) -> FailurePolicy {
    if keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "dashctl=debug" } else { "dashctl=warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::RefreshCogs {
            period,
            no_open,
            keep_going,
            dry_run,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            cli::cogs::run(&config, period, !no_open, policy(keep_going), dry_run).await?
        }

        Commands::RefreshLabor {
            no_open,
            keep_going,
            dry_run,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            cli::labor::run(&config, !no_open, policy(keep_going), dry_run).await?
        }

        Commands::RefreshProductMix {
            debug,
            no_open,
            keep_going,
            dry_run,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            cli::product_mix::run(&config, debug, !no_open, policy(keep_going), dry_run).await?
        }

        Commands::Daily {
            no_email,
            no_publish,
            no_open,
            keep_going,
            dry_run,
        } => {
            let config = Config::load(cli.config.as_deref())?;
            let opts = PlanOptions {
                open: !no_open,
                email: !no_email,
                publish: !no_publish,
            };
            cli::daily::run(&config, opts, policy(keep_going), dry_run).await?
        }

        Commands::History { limit } => {
            let config = Config::load(cli.config.as_deref())?;
            cli::history::run(&config, limit).await?
        }

        Commands::Config { init, force } => {
            cli::config::run(cli.config.as_deref(), init, force).await?
        }
    }

    Ok(())
}
