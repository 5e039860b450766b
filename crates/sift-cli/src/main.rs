mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sift",
    version,
    about = "Persona-driven section ranking for PDF collections"
)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the sections of a document collection for a persona and task
    Analyze {
        /// Path to the input JSON (persona, job_to_be_done, documents)
        input_file: PathBuf,

        /// Directory holding the PDFs (default: PDFs/ next to the input file)
        #[arg(long, value_name = "DIR")]
        pdf_dir: Option<PathBuf>,

        /// Output JSON path (default: challenge1b_output.json next to the input file)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        embed: EmbedArgs,
    },
    /// Show the chunks extracted from a single PDF (without ranking)
    Segment {
        /// Path to PDF file
        pdf_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Print the query string synthesized from a persona and task
    Query {
        #[arg(long)]
        persona: String,

        #[arg(long)]
        task: String,
    },
}

/// Embedding endpoint settings.
#[derive(Args, Debug, Clone)]
pub struct EmbedArgs {
    /// Base URL of an OpenAI-compatible embeddings API
    #[arg(
        long,
        env = "SIFT_EMBED_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub embed_base_url: String,

    /// Embedding model identifier
    #[arg(long, env = "SIFT_EMBED_MODEL", default_value = "text-embedding-3-small")]
    pub embed_model: String,

    /// API key sent as a bearer token (optional for local servers)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub embed_api_key: Option<String>,

    /// Optional dimension override when supported by the model
    #[arg(long, env = "SIFT_EMBED_DIMENSIONS")]
    pub embed_dimensions: Option<usize>,

    /// Max number of texts per embedding request
    #[arg(long, env = "SIFT_EMBED_BATCH_SIZE", default_value_t = 64)]
    pub embed_batch_size: usize,

    /// Max seconds to wait for each embedding request
    #[arg(long, env = "SIFT_EMBED_TIMEOUT_SECS", default_value_t = 60)]
    pub embed_timeout_secs: u64,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sift_cli={default_level},sift_core={default_level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            input_file,
            pdf_dir,
            out,
            embed,
        } => commands::analyze::run(input_file, pdf_dir, out, embed),
        Commands::Segment { pdf_file, output } => commands::segment::run(pdf_file, &output),
        Commands::Query { persona, task } => commands::query::run(&persona, &task),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
