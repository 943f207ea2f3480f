use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use rtcm2_json::classifier::{classify, probe_type};
use rtcm2_json::config::DEFAULT_PATH_LIMIT;
use rtcm2_json::{summarize, DecodeOptions, MappedFile, Rtcm2Reader};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "RTCM2_LOG";

/// Decode RTCM2 messages from newline-delimited JSON
#[derive(Parser)]
#[command(name = "rtcm2-json")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoder activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every message in a file
    Decode {
        /// Input file, one JSON object per line
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print decoded messages re-encoded as JSON
        #[arg(long)]
        json: bool,

        /// Bound on the stored device path, in bytes
        #[arg(long, env = "RTCM2_PATH_LIMIT", default_value_t = DEFAULT_PATH_LIMIT)]
        path_limit: usize,
    },

    /// Show the schema each message would be decoded with
    Classify {
        /// Input file, one JSON object per line
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Tabulate message headers
    Summary {
        /// Input file, one JSON object per line
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Keep only messages of this type
        #[arg(long = "type", value_name = "TYPE")]
        msg_type: Option<u32>,

        /// Display only first N rows (default: all)
        #[arg(short = 'n', long)]
        head: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match std::env::var(LOG_ENV) {
            Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
                eprintln!("invalid {} directive ({}); defaulting to warn", LOG_ENV, err);
                EnvFilter::new("warn")
            }),
            Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode {
            input,
            json,
            path_limit,
        } => decode_command(input, json, path_limit)?,

        Commands::Classify { input } => classify_command(input)?,

        Commands::Summary {
            input,
            msg_type,
            head,
        } => summary_command(input, msg_type, head)?,
    }

    Ok(())
}

fn decode_command(input: PathBuf, json: bool, path_limit: usize) -> Result<()> {
    let options = DecodeOptions::default().with_path_limit(path_limit);

    let start = Instant::now();
    let results = Rtcm2Reader::read_file(&input, &options)
        .with_context(|| format!("Failed to read RTCM2 file: {}", input.display()))?;
    let duration = start.elapsed();

    let mut failed = 0usize;
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(decoded) if json => println!("{}", decoded.message.to_json_string()),
            Ok(decoded) => println!("{:?}", decoded.message),
            Err(err) => {
                failed += 1;
                eprintln!("message {}: status {}: {}", index + 1, err.status(), err);
            }
        }
    }

    eprintln!(
        "Decoded {} of {} messages ({:.3}s)",
        results.len() - failed,
        results.len(),
        duration.as_secs_f64()
    );

    if failed > 0 {
        anyhow::bail!("{} message(s) failed to decode", failed);
    }
    Ok(())
}

fn classify_command(input: PathBuf) -> Result<()> {
    let mapped = MappedFile::open(&input)
        .with_context(|| format!("Failed to read RTCM2 file: {}", input.display()))?;
    let data = mapped
        .text()
        .with_context(|| format!("RTCM2 file is not UTF-8: {}", input.display()))?;

    for (index, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let probed = probe_type(line)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:6} {:>10} {}", index + 1, probed, classify(line).name());
    }

    Ok(())
}

fn summary_command(input: PathBuf, msg_type: Option<u32>, head: Option<usize>) -> Result<()> {
    let results = Rtcm2Reader::read_file(&input, &DecodeOptions::default())
        .with_context(|| format!("Failed to read RTCM2 file: {}", input.display()))?;

    let messages: Vec<_> = results
        .into_iter()
        .filter_map(|r| r.ok().map(|d| d.message))
        .collect();
    let mut df = summarize(&messages).context("Failed to build summary")?;

    if let Some(t) = msg_type {
        df = df.lazy().filter(col("type").eq(lit(t))).collect()?;
        println!("Filtered to type {}: {} rows", t, df.height());
    }

    if let Some(n) = head {
        df = df.head(Some(n));
        println!("Showing first {} rows", n);
    }

    println!("\n{}", df);
    Ok(())
}
