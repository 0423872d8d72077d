//! self-review command line entry point

use clap::{Parser, Subcommand};

mod commands;
mod report;
mod snapshot;

#[derive(Parser)]
#[command(
    name = "self-review",
    version,
    about = "Summarize your recent engineering work from GitHub and Jira"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch recent work from GitHub and Jira
    Fetch {
        /// Natural language date range (e.g. "last 3 months", "q2 of this year")
        date_range: Option<String>,

        /// Fetch work since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },

    /// Analyze the most recent fetch and generate a summary
    Analyze {
        /// Display an existing analysis file instead of running the analysis
        #[arg(long, value_name = "FILE")]
        display: Option<String>,
    },

    /// Check connectivity to the configured services
    Check,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = review_config::Config::load();

    let result = match cli.command {
        Command::Fetch { date_range, since } => {
            // The positional argument wins over --since
            let input = date_range.or(since);
            commands::fetch::run(&config, input.as_deref()).await
        }
        Command::Analyze { display } => commands::analyze::run(&config, display.as_deref()).await,
        Command::Check => commands::check::run(&config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
