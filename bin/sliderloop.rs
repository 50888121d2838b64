//! Line-oriented looper host.
//!
//! Reads stdin one line at a time: a number is fed to the looper as an input
//! value, anything else is parsed as a command (`record`, `stop`, `play`,
//! `save <path>`, `load <path>`). Played-back values are printed to stdout.
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use sliderloop::{Command, LooperThread, Result};
use std::io::{self, BufRead};
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let looper = LooperThread::builder().build()?;
    let handle = looper.handle();

    let output = looper.output().clone();
    let printer = thread::spawn(move || {
        for value in output.iter() {
            println!("{value}");
        }
    });

    tracing::info!("sliderloop ready");

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Ok(value) = line.parse::<f32>() {
            handle.input(value)?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => handle.send(command)?,
            Err(e) => tracing::warn!("{}", e),
        }
    }

    handle.sync()?;
    drop(looper);
    let _ = printer.join();

    tracing::info!("sliderloop shutting down");
    Ok(())
}
