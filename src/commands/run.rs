use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{Config, Pipeline, TriggerWatcher, WorkerPool};

pub fn execute(config: &Config) -> Result<()> {
    let pipeline = Pipeline::from_config(config).context("Failed to set up the pipeline")?;
    let pool = WorkerPool::start(config.threads, config.queue_capacity(), Arc::new(pipeline))?;
    let watcher = TriggerWatcher::from_config(config);

    // Create shared shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    ctrlc::set_handler(move || {
        println!();
        println!("{}", "Shutdown requested...".yellow().bold());
        println!("{}", "Finishing in-flight items (this may take a while)...".dimmed());
        shutdown_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    println!(
        "{} {}",
        "Watching for completed downloads with".cyan().bold(),
        format!("{} worker(s)", config.threads).yellow().bold()
    );
    println!("{}", "Press Ctrl+C to stop".dimmed());

    let sender = pool.sender()?;
    watcher.run(&sender, &shutdown, config.poll_interval());

    // Closing the last sender lets the workers drain the queue and exit
    drop(sender);
    pool.shutdown();

    println!("{}", "Stopped.".green());
    Ok(())
}
