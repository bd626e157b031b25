mod dedup;
mod error;
mod fetch;
mod parser;
mod record;
mod settings;
mod snapshot;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use settings::Settings;
use snapshot::{Outcome, Snapshot};

#[derive(Parser)]
#[command(name = "prompt_harvest", about = "Harvest new prompts from awesome-list READMEs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a source, extract prompts and write the new ones to the snapshot file
    Run {
        /// Source name from settings (default: first configured)
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Extract prompts from a local markdown file and print them as JSON
    Extract {
        /// Markdown file to read
        #[arg(short, long)]
        file: PathBuf,
        /// Source whose defaults and location apply (default: first configured)
        #[arg(short, long)]
        source: Option<String>,
        /// Only print records missing from the reference cache
        #[arg(long)]
        new_only: bool,
    },
    /// List configured sources
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Falling back to default settings: {}", e);
        Settings::default()
    });

    let result = match cli.command {
        Commands::Run { source } => run(&settings, source.as_deref()).await,
        Commands::Extract {
            file,
            source,
            new_only,
        } => {
            let source = settings.source(source.as_deref())?;
            let markdown = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let mut records = parser::extract(&markdown, source);
            if new_only {
                let reference = store::load_reference(&settings.cache_path);
                records = dedup::filter_new(&records, &reference);
            }
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Commands::Sources => {
            println!("{:<24} | {}", "Name", "Origin");
            println!("{}", "-".repeat(80));
            for s in &settings.sources {
                println!("{:<24} | {}", s.name, s.origin_link());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

async fn run(settings: &Settings, source_name: Option<&str>) -> anyhow::Result<()> {
    let source = settings.source(source_name)?;
    let reference = store::load_reference(&settings.cache_path);

    let pb = spinner(format!("Fetching {}", source.location))?;
    let fetched = fetch::fetch_document(&source.location, settings.timeout()).await;
    pb.finish_and_clear();

    let snapshot = Snapshot::harvest(source, fetched, &reference);
    store::write_snapshot(&settings.output_path, &snapshot)
        .context("Failed to write snapshot")?;

    match &snapshot.outcome {
        Outcome::Ok => println!(
            "Found {} candidates, {} new (checked against {} known). Saved to {:?}.",
            snapshot.candidates,
            snapshot.records.len(),
            reference.len(),
            settings.output_path,
        ),
        Outcome::Unreachable { kind, reason } => println!(
            "Could not fetch {} ({}): {}\nNo new prompts saved to {:?}.",
            source.name, kind, reason, settings.output_path,
        ),
    }
    Ok(())
}

fn spinner(message: String) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
