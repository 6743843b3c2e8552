//! traitmark CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "traitmark", version, about = "Psychometric test scoring")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample test
    Init,

    /// Validate test files
    Validate {
        /// Test file or directory (defaults to the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List available tests
    List {
        /// Test file or directory (defaults to the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Register a respondent
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    /// List registered respondents with their result counts
    Respondents,

    /// Score an answers file and store the result
    Submit {
        /// Respondent id
        #[arg(long)]
        user: String,

        /// Test id
        #[arg(long)]
        test: String,

        /// TOML or JSON file mapping question id to option index
        #[arg(long)]
        answers: PathBuf,

        /// Test file or directory (defaults to the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show a respondent's results, newest first
    History {
        /// Respondent id
        #[arg(long)]
        user: String,
    },

    /// Show one stored result
    Show {
        /// Respondent id
        #[arg(long)]
        user: String,

        /// Position in the history (0 is the newest)
        #[arg(long, default_value = "0")]
        index: usize,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Aggregate statistics across all respondents
    Stats,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("traitmark=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { catalog } => commands::validate::execute(catalog, config),
        Commands::List { catalog } => commands::list::execute(catalog, config),
        Commands::Register {
            first_name,
            last_name,
        } => commands::register::execute(first_name, last_name, config).await,
        Commands::Respondents => commands::respondents::execute(config).await,
        Commands::Submit {
            user,
            test,
            answers,
            catalog,
            format,
        } => commands::submit::execute(user, test, answers, catalog, format, config).await,
        Commands::History { user } => commands::history::execute(user, config).await,
        Commands::Show {
            user,
            index,
            format,
            output,
        } => commands::show::execute(user, index, format, output, config).await,
        Commands::Stats => commands::stats::execute(config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
