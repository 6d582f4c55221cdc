//! Askboard CLI
//!
//! Ask the sales analytics backend questions from the terminal:
//! - One-shot questions with text, JSON or CSV output
//! - Interactive session with example chips
//! - Forecast training, raw forecasts and backend diagnostics

use anyhow::{bail, Context};
use askboard::client::{Backend, BackendClient};
use askboard::config::{generate_default_config, Config};
use askboard::payload::AskResponse;
use askboard::render::{forecast_to_csv, table_to_csv, TextRenderer};
use askboard::session::{Session, SubmitOutcome};
use askboard::view::{ForecastChart, TableView};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "askboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask natural-language questions about your sales data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend URL (overrides config and ASKBOARD_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable ANSI styling
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show generated SQL expanded
    #[arg(long, global = true)]
    pub show_sql: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Ask {
        /// The question (words are joined with spaces)
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Interactive session (default)
    Repl,

    /// Train the backend's forecast model
    Train,

    /// Fetch a raw forecast
    Forecast {
        /// Number of days to forecast
        #[arg(short, long, default_value = "30")]
        periods: u32,
    },

    /// Check backend and database health
    Health,

    /// Show table row counts and a sample of the training data
    Stats,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the effective configuration instead
        #[arg(long)]
        effective: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    if cli.no_color {
        config.ui.color = false;
    }
    if cli.show_sql {
        config.ui.show_sql = true;
    }

    askboard::logging::init(&config.logging).context("Failed to initialize logging")?;
    tracing::debug!(backend = %config.backend.base_url, "Configuration loaded");

    let renderer = TextRenderer::from_config(&config.ui);
    let command = cli.command.unwrap_or(Commands::Repl);

    let client = BackendClient::new(&config.backend)?;

    match command {
        Commands::Ask { question } => {
            let session = Session::new(client, config.ui.examples.clone());
            session.set_query(question.join(" ")).await;

            if session.submit().await == SubmitOutcome::Rejected {
                bail!("Question is empty");
            }

            let state = session.snapshot().await;
            if let Some(error) = state.error {
                eprint!("{}", renderer.error_banner(&error));
                std::process::exit(1);
            }
            if let Some(response) = state.response {
                print_response(&response, cli.format, &renderer)?;
            }
        }

        Commands::Repl => {
            let session = Session::new(client, config.ui.examples.clone());
            run_repl(session, renderer).await?;
        }

        Commands::Train => match client.train_forecast().await {
            Ok(status) => match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                _ => print!("{}", renderer.train_status(&status)),
            },
            Err(e) => {
                eprint!("{}", renderer.error_banner(&e.to_string()));
                std::process::exit(1);
            }
        },

        Commands::Forecast { periods } => match client.forecast(periods).await {
            Ok(points) => match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
                OutputFormat::Csv => print!("{}", forecast_to_csv(&points)?),
                OutputFormat::Text => {
                    print!("{}", renderer.render_forecast(&ForecastChart::from_points(&points)))
                }
            },
            Err(e) => {
                eprint!("{}", renderer.error_banner(&e.to_string()));
                std::process::exit(1);
            }
        },

        Commands::Health => {
            let health = match client.health().await {
                Ok(health) => health,
                Err(e) => {
                    eprintln!("Cannot reach backend at {}", client.base_url());
                    eprint!("{}", renderer.error_banner(&e.to_string()));
                    std::process::exit(1);
                }
            };

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                _ => {
                    println!("Backend:  {}", health.status);
                    if let Some(database) = &health.database {
                        println!("Database: {}", database);
                    }
                    if let Some(error) = &health.error {
                        println!("Error:    {}", error);
                    }
                }
            }
            if !health.is_healthy() {
                std::process::exit(1);
            }
        }

        Commands::Stats => {
            let (counts, sample) = tokio::join!(client.table_stats(), client.sales_sample());
            let counts = counts.context("Failed to fetch table stats")?;
            let sample = sample.context("Failed to fetch sales sample")?;

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({ "tables": counts, "sales": sample });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Csv => {
                    println!("table,rows");
                    for (table, rows) in &counts {
                        println!("{},{}", table, rows);
                    }
                }
                OutputFormat::Text => {
                    println!("{:<20} {:>10}", "Table", "Rows");
                    println!("{}", "-".repeat(31));
                    for (table, rows) in &counts {
                        println!("{:<20} {:>10}", table, rows);
                    }

                    println!();
                    match &sample.error {
                        Some(error) => println!("Sales data: {}", error),
                        None => {
                            println!("Sales data points: {}", sample.data_count);
                            for row in &sample.sample_data {
                                println!("  {}", serde_json::Value::Object(row.clone()));
                            }
                        }
                    }
                }
            }
        }

        Commands::Config { effective: true, .. } => print!("{}", toml::to_string_pretty(&config)?),
        Commands::Config { output, .. } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

fn print_response(
    response: &AskResponse,
    format: OutputFormat,
    renderer: &TextRenderer,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let view = askboard::view::ResponseView::from_payload(response);
            print!("{}", renderer.render(&view));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
        OutputFormat::Csv => {
            if let Some(table) = response.table_result() {
                print!("{}", table_to_csv(&TableView::from_result(&table))?);
            } else if let Some(points) = response.forecast_points() {
                print!("{}", forecast_to_csv(&points)?);
            } else {
                bail!("Response has no tabular result to write as CSV");
            }
        }
    }
    Ok(())
}

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Quit,
    Help,
    ToggleSql,
    Train,
    /// Put example chip N (1-based) into the input
    Example(usize),
    /// Submit the given text, or the current input when `None`
    Submit(Option<String>),
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return if line.is_empty() {
                ReplCommand::Submit(None)
            } else {
                ReplCommand::Submit(Some(line.to_string()))
            };
        };

        match command {
            "q" | "quit" | "exit" => ReplCommand::Quit,
            "h" | "help" => ReplCommand::Help,
            "sql" => ReplCommand::ToggleSql,
            "train" => ReplCommand::Train,
            n => match n.parse::<usize>() {
                Ok(index) if index > 0 => ReplCommand::Example(index),
                _ => ReplCommand::Unknown(n.to_string()),
            },
        }
    }
}

const REPL_HELP: &str = "\
Type a question and press Enter to ask it.
  :N      put example N into the input (Enter on an empty line submits it)
  :sql    show or hide generated SQL
  :train  train the forecast model
  :quit   leave
";

async fn run_repl(
    session: Session<BackendClient>,
    mut renderer: TextRenderer,
) -> anyhow::Result<()> {
    println!(
        "{} {}",
        renderer.style.bold("askboard"),
        renderer.style.dim(session.backend().base_url())
    );
    print!("{}", renderer.example_chips(session.examples()));
    println!("{}", renderer.style.dim("Type :help for commands"));
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => print!("{}", REPL_HELP),
            ReplCommand::ToggleSql => {
                renderer.show_sql = !renderer.show_sql;
                if let Some(view) = session.view().await {
                    print!("{}", renderer.render(&view));
                }
            }
            ReplCommand::Train => {
                if session.snapshot().await.training {
                    println!("{}", renderer.style.dim("Training already in progress"));
                } else {
                    spawn_train(session.clone(), renderer.clone());
                }
            }
            ReplCommand::Example(n) => match session.select_example(n - 1).await {
                Ok(example) => println!("{} {}", renderer.style.dim("input:"), example),
                Err(e) => print!("{}", renderer.error_banner(&e.to_string())),
            },
            ReplCommand::Submit(text) => {
                if let Some(text) = text {
                    session.set_query(text).await;
                }
                if session.state().is_loading().await {
                    println!("{}", renderer.style.dim("A request is already in progress"));
                } else if session.can_submit().await {
                    println!("{}", renderer.style.dim("…"));
                    spawn_submit(session.clone(), renderer.clone());
                }
            }
            ReplCommand::Unknown(command) => {
                print!("{}", renderer.error_banner(&format!("Unknown command :{}", command)))
            }
        }
        prompt();
    }

    Ok(())
}

fn spawn_submit(session: Session<BackendClient>, renderer: TextRenderer) {
    tokio::spawn(async move {
        if session.submit().await != SubmitOutcome::Applied {
            return;
        }
        let state = session.snapshot().await;
        match (&state.error, session.view().await) {
            (Some(error), _) => print!("\n{}", renderer.error_banner(error)),
            (None, Some(view)) => print!("\n{}", renderer.render(&view)),
            (None, None) => {}
        }
        prompt();
    });
}

fn spawn_train(session: Session<BackendClient>, renderer: TextRenderer) {
    tokio::spawn(async move {
        if session.train().await != SubmitOutcome::Applied {
            return;
        }
        let state = session.snapshot().await;
        match (&state.train_error, &state.train_status) {
            (Some(error), _) => print!("\n{}", renderer.error_banner(error)),
            (None, Some(status)) => print!("\n{}", renderer.train_status(status)),
            (None, None) => {}
        }
        prompt();
    });
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
