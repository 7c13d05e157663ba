use clap::Parser;
use marketbrief::application::interpret::QueryInterpreter;
use marketbrief::application::validate::Validator;
use marketbrief::cli::commands::{Cli, Commands};
use marketbrief::config::{AppConfig, Settings};
use marketbrief::domain::entities::query::Query;
use marketbrief::domain::entities::report::Report;
use marketbrief::domain::error::DomainError;
use marketbrief::MarketBrief;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const CHAT_HELP: &str = "\
Ask about a stock, e.g. \"Get the latest price of Microsoft\" or \"Compare TSLA and NVDA performance\".
  /save   save the last report as markdown
  /clear  forget the last report
  /help   show this message
  /exit   quit";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,marketbrief=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_command(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load(
    offline: bool,
    output_dir: Option<PathBuf>,
    model: Option<String>,
) -> Result<MarketBrief, DomainError> {
    let mut config = AppConfig::from_env(offline)?;
    if let Some(dir) = output_dir {
        config.settings.output_dir = dir;
    }
    if let Some(model) = model {
        config.settings.completion.model = model;
    }
    MarketBrief::new(&config)
}

async fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ask {
            query,
            save,
            json,
            offline,
            output_dir,
            model,
        } => {
            let mb = load(offline, output_dir, model)?;
            let answer = mb.ask(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                print_report(&answer.report);
            }
            if save {
                let path = mb.save(&answer.report)?;
                eprintln!("Saved report to {}", path.display());
            }
        }
        Commands::Chat {
            offline,
            output_dir,
            model,
        } => {
            let mb = load(offline, output_dir, model)?;
            chat(&mb).await?;
        }
        Commands::Interpret { query } => {
            let settings = Settings::default();
            let query = Query::new(query);
            Validator::new(settings.lexicon.clone()).validate(&query)?;
            let interpretation = QueryInterpreter::new(settings.lexicon).interpret(&query);
            println!("{}", serde_json::to_string_pretty(&interpretation)?);
        }
        Commands::Status => {
            let mb = load(true, None, None)?;
            let status = mb.market_status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("# {}\n", report.title);
    println!("{}", report.body);
}

async fn chat(mb: &MarketBrief) -> Result<(), Box<dyn std::error::Error>> {
    println!("{CHAT_HELP}\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last: Option<Report> = None;

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/exit" | "/quit" => break,
            "/help" => println!("{CHAT_HELP}"),
            "/clear" => {
                last = None;
                println!("Cleared.");
            }
            "/save" => match &last {
                Some(report) => match mb.save(report) {
                    Ok(path) => println!("Saved report to {}", path.display()),
                    // The report stays on screen; only the save failed.
                    Err(e) => println!("{e}"),
                },
                None => println!("Nothing to save yet."),
            },
            text => match mb.ask(text).await {
                Ok(answer) => {
                    print_report(&answer.report);
                    last = Some(answer.report);
                }
                Err(e) => println!("{e}"),
            },
        }
        println!();
    }
    Ok(())
}
