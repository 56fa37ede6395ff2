//! rangebench - cached vs. uncached range-sum benchmark

mod baseline;
mod runner;
mod workload;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::workload::WorkloadConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Array length
    #[arg(short = 'n', long, default_value_t = 100_000)]
    len: usize,

    /// Number of operations
    #[arg(short, long, default_value_t = 50_000)]
    queries: usize,

    /// Cache capacity (number of ranges)
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Number of distinct hot ranges
    #[arg(long, default_value_t = 30)]
    hot_pool: usize,

    /// Probability that a range query hits the hot pool
    #[arg(long, default_value_t = 0.95)]
    p_hot: f64,

    /// Probability that an operation is an update
    #[arg(long, default_value_t = 0.03)]
    p_update: f64,

    /// Upper bound for generated values
    #[arg(long, default_value_t = 100)]
    max_value: i64,

    /// RNG seed for a reproducible workload
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn workload(&self) -> WorkloadConfig {
        WorkloadConfig {
            len: self.len,
            queries: self.queries,
            hot_pool: self.hot_pool,
            p_hot: self.p_hot,
            p_update: self.p_update,
            max_value: self.max_value,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = args.workload();
    config.validate()?;

    info!("Starting rangebench v{}", env!("CARGO_PKG_VERSION"));
    info!("Array length: {}", config.len);
    info!("Operations: {}", config.queries);
    info!("Cache capacity: {}", args.capacity);
    if let Some(seed) = args.seed {
        info!("Seed: {}", seed);
    }

    let mut rng = workload::rng(args.seed);
    let ops = workload::make_queries(&config, &mut rng);
    let array = workload::base_array(&config, &mut rng);

    let report = runner::run(&array, &ops, args.capacity)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("No cache : {:.2} s", report.uncached_secs);
        println!(
            "LRU cache: {:.2} s  (speedup x{:.1})",
            report.cached_secs, report.speedup
        );
        println!(
            "Hits: {}  Misses: {}  Hit ratio: {:.1}%",
            report.hits,
            report.misses,
            report.hit_ratio * 100.0
        );
        println!(
            "Inserts: {}  Evictions: {}  Invalidations: {}",
            report.inserts, report.evictions, report.invalidations
        );
    }

    if report.mismatches > 0 {
        error!("{} results differ between cached and uncached runs", report.mismatches);
        anyhow::bail!("cached results diverged from the uncached baseline");
    }

    Ok(())
}
