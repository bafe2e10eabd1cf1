//! CLI argument parsing and dispatch configuration

use anyhow::{Context, Result};
use clap::Parser;
use rated_dispatch_core::{DispatchConfig, OrchestratorBuilder, RateLimitConfig, RunSummary};
use std::path::PathBuf;

/// Dispatch project IDs across a worker pool under one global rate limit
///
/// With no arguments, 200 project IDs are processed by 5 workers in batches
/// of 10 at 95 per minute with bursts of 5.
#[derive(Parser, Debug)]
#[command(name = "rated-dispatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a JSON dispatch configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Total number of project IDs
    #[arg(long)]
    pub total: Option<usize>,

    /// Project IDs per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Sustained ceiling in permits per minute
    #[arg(long)]
    pub per_minute: Option<u32>,

    /// Token bucket capacity
    #[arg(long)]
    pub burst: Option<u32>,

    /// Work queue buffer, in batches
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Disable rate limiting
    #[arg(long, conflicts_with_all = ["per_minute", "burst"])]
    pub unlimited: bool,
}

impl Cli {
    /// Resolve the dispatch configuration from the config file and flags
    pub fn dispatch_config(&self) -> Result<DispatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str::<DispatchConfig>(&raw)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => DispatchConfig::default(),
        };

        if let Some(total) = self.total {
            config.total_items = total;
        }
        if let Some(size) = self.batch_size {
            config.batch_size = size;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.channel.queue_buffer = capacity;
        }

        if self.unlimited {
            config.rate_limit = None;
        } else if self.per_minute.is_some() || self.burst.is_some() {
            let base = config.rate_limit.unwrap_or_default();
            config.rate_limit = Some(RateLimitConfig::new(
                self.per_minute.unwrap_or(base.per_minute),
                self.burst.unwrap_or(base.burst),
            ));
        }

        config.validate().context("Invalid dispatch configuration")?;
        Ok(config)
    }

    /// Run one dispatch and return its summary
    pub async fn run(&self) -> Result<RunSummary> {
        let config = self.dispatch_config()?;
        let orchestrator = OrchestratorBuilder::new()
            .config(config)
            .build()
            .context("Failed to build orchestrator")?;

        let summary = orchestrator.run().await.context("Dispatch failed")?;
        Ok(summary)
    }
}
