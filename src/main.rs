use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use contribution::batch;
use contribution::config::Config;
use contribution::corpus::SourceDocument;
use contribution::dataset::{self, Dataset};
use contribution::output::terminal;
use contribution::pairwise::{self, DistanceCache, DocumentDistance};
use contribution::pipeline::ContributionPipeline;
use contribution::text::Tokenizer;

/// Contribution: how much new content a publication adds relative to the
/// work it cites and the work that cites it.
#[derive(Parser)]
#[command(name = "contribution", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Orthogonal displacement from the predecessor→successor line
    Geometric,
    /// Mean cited/citing distance adjusted by within-group spread
    Pairwise,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a target text file against predecessor and successor files
    Score {
        /// Extracted text of the target publication
        #[arg(long)]
        target: PathBuf,

        /// Text of a publication the target cites (repeatable)
        #[arg(long = "predecessor", short = 'p', required = true)]
        predecessors: Vec<PathBuf>,

        /// Text of a publication citing the target (repeatable)
        #[arg(long = "successor", short = 's', required = true)]
        successors: Vec<PathBuf>,

        #[arg(long, value_enum, default_value = "geometric")]
        method: Method,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score one document of the configured dataset
    Run {
        /// Document id (file stem in the data directory)
        #[arg(long)]
        doc_id: String,

        #[arg(long, value_enum, default_value = "geometric")]
        method: Method,

        #[arg(long)]
        json: bool,
    },

    /// Score every dataset document that has predecessors and successors
    Batch {
        /// Number of documents to score in parallel (geometric only)
        #[arg(long, default_value = "8")]
        concurrency: usize,

        #[arg(long, value_enum, default_value = "geometric")]
        method: Method,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("contribution=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Score {
            target,
            predecessors,
            successors,
            method,
            json,
        } => {
            let sources = dataset::load_sources(&target, &predecessors, &successors)?;
            score_one(
                &config,
                sources.target,
                sources.predecessors,
                sources.successors,
                method,
                json,
            )?;
        }

        Commands::Run {
            doc_id,
            method,
            json,
        } => {
            let dataset = Dataset::load(&config.data_dir, &config.citations_path)?;
            let sources = dataset.sources(&doc_id)?;
            info!(
                doc = %doc_id,
                predecessors = sources.predecessors.len(),
                successors = sources.successors.len(),
                "Resolved citation neighbourhood"
            );
            score_one(
                &config,
                sources.target,
                sources.predecessors,
                sources.successors,
                method,
                json,
            )?;
        }

        Commands::Batch {
            concurrency,
            method,
            json,
        } => {
            let dataset = Dataset::load(&config.data_dir, &config.citations_path)?;
            let targets = dataset.scorable_ids();
            if !json {
                println!(
                    "Scoring {} documents ({} method)...",
                    targets.len(),
                    format!("{method:?}").to_lowercase()
                );
            }

            let rows: Vec<batch::BatchRow> = match method {
                Method::Geometric => {
                    let pipeline = Arc::new(ContributionPipeline::new(
                        config.tokenizer_config(),
                        config.geometry_options(),
                    ));
                    batch::score_all(Arc::new(dataset), pipeline, targets, concurrency)
                        .await?
                        .iter()
                        .map(|o| o.row())
                        .collect()
                }
                Method::Pairwise => {
                    let calculator =
                        DocumentDistance::new(Tokenizer::new(config.tokenizer_config()));
                    let mut cache = DistanceCache::new();
                    batch::score_all_pairwise(&dataset, &calculator, &targets, &mut cache)?
                        .iter()
                        .map(|o| o.row())
                        .collect()
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                terminal::display_batch(&rows);
            }
        }
    }

    Ok(())
}

/// Score one target with the chosen method and print the result.
fn score_one(
    config: &Config,
    target: SourceDocument,
    predecessors: Vec<SourceDocument>,
    successors: Vec<SourceDocument>,
    method: Method,
    json: bool,
) -> Result<()> {
    match method {
        Method::Geometric => {
            let pipeline =
                ContributionPipeline::new(config.tokenizer_config(), config.geometry_options());
            let report = pipeline.compute(target, predecessors, successors)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_report(&report);
                if report.degenerate {
                    println!(
                        "{}",
                        "Predecessor and successor centroids coincide; the score is a plain distance."
                            .dimmed()
                    );
                }
            }
        }
        Method::Pairwise => {
            let calculator = DocumentDistance::new(Tokenizer::new(config.tokenizer_config()));
            let mut cache = DistanceCache::new();
            let result = pairwise::contribution(&predecessors, &successors, &calculator, &mut cache)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_pairwise(&target.id, &result);
            }
        }
    }
    Ok(())
}
