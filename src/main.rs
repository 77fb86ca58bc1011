use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::{Builder, Handle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use keypad_calc::config::{Cli, Settings, StorageLocation};
use keypad_calc::repl::start_repl;
use keypad_calc::{Calculator, FileStore, HistoryStore, KeyValueStore, MemoryStore};

fn run<S: KeyValueStore + 'static>(store: S, runtime: Handle) -> anyhow::Result<()> {
    let mut calc = Calculator::new(HistoryStore::new(Arc::new(store), runtime.clone()));
    let outcome = start_repl(&mut calc);
    runtime.block_on(calc.flush_history());
    outcome
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_cli(Cli::parse());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start storage runtime")?;

    let outcome = match &settings.storage {
        StorageLocation::Disk(dir) => {
            info!(dir = %dir.display(), "using on-disk history");
            run(FileStore::new(dir), runtime.handle().clone())
        }
        StorageLocation::Memory => {
            info!("using in-memory history");
            run(MemoryStore::new(), runtime.handle().clone())
        }
    };

    runtime.shutdown_timeout(Duration::from_secs(2));
    outcome
}
