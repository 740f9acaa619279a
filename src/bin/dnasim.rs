use anyhow::{bail, Context, Result};
use clap::Parser;
use dna_storage_sim::history::RunHistory;
use dna_storage_sim::{Pipeline, PipelineConfig, RunRecord};
use log::error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// DNA storage simulator: compresses text, maps it onto bases, protects it
/// with a Hamming code and pushes it through a noisy channel.
#[derive(Parser, Debug)]
#[command(name = "dnasim", version, about, long_about = None)]
struct Cli {
    /// Text to run through the pipeline
    #[arg(long, conflicts_with = "input_file")]
    text: Option<String>,

    /// Path to an input data file
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Treat every line of the input file as a separate run
    #[arg(long, requires = "input_file")]
    batch: bool,

    /// Per-base substitution error rate
    #[arg(long, default_value_t = 0.01)]
    error_rate: f64,

    /// Results database path
    #[arg(long, default_value = "results_db.json")]
    save_db: PathBuf,

    /// Seed for the substitution channel (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        error_rate: cli.error_rate,
        seed: cli.seed,
    };
    let mut pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;
    let mut history = RunHistory::open(&cli.save_db);

    if cli.batch {
        // `requires` guarantees the file is present.
        let Some(path) = cli.input_file.as_ref() else {
            bail!("--batch needs --input-file");
        };
        return run_batch(&pipeline, &mut history, path);
    }

    let text = match (&cli.text, &cli.input_file) {
        (Some(text), _) => text.trim().to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?
            .trim()
            .to_string(),
        (None, None) => prompt("Enter data to process: ")?,
    };

    let record = pipeline.run(&text).context("pipeline run failed")?;
    report(&record);
    history
        .store(record.key(), record)
        .with_context(|| format!("could not save to {}", cli.save_db.display()))?;
    Ok(())
}

fn run_batch(pipeline: &Pipeline, history: &mut RunHistory, path: &Path) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    let lines: Vec<&str> = contents.lines().collect();

    let mut failures = 0;
    for result in pipeline.run_batch(&lines) {
        match result {
            Ok(record) => {
                report(&record);
                history.store(record.key(), record)?;
            }
            Err(e) => {
                error!("batch line failed: {}", e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{} batch line(s) failed", failures);
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn report(record: &RunRecord) {
    let preview: String = record.input.chars().take(50).collect();
    let ellipsis = if record.input.chars().count() > 50 {
        "..."
    } else {
        ""
    };
    println!("\nRunning DNA storage pipeline for: {}{}", preview, ellipsis);
    println!("Results:");
    println!("{}", record.summary());
    println!("  Decompressed: {}", record.decompressed);
}
