use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketbrief", about = "Stock questions in, market-data reports out")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer one question
    Ask {
        /// e.g. "Compare TSLA and NVDA performance"
        query: String,
        /// Write the report to the output directory
        #[arg(long)]
        save: bool,
        /// Print the full answer (interpretation, snapshots, report) as JSON
        #[arg(long)]
        json: bool,
        /// Skip the language model and report the raw market data
        #[arg(long)]
        offline: bool,
        /// Directory for saved reports (overrides MARKETBRIEF_REPORTS_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Chat model (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
    /// Interactive session; /save, /clear, /help, /exit
    Chat {
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Show how a question would be interpreted, without fetching anything
    Interpret { query: String },
    /// Show whether US markets are open
    Status,
}
