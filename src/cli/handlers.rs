use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::commands::{Cli, Commands, GetArgs, RmArgs, SetArgs, WatchArgs};
use crate::cli::{config, output};
use crate::store::{DurableStore, Store, StoreError};
use crate::sync::StoreWatcher;

/// Error type for CLI command handling
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("value is not valid JSON: {0}")]
    InvalidValue(#[from] serde_json::Error),
    #[error("could not watch store directory: {0}")]
    Watch(#[from] notify::Error),
}

/// Dispatch a parsed command line.
pub fn dispatch(cli: Cli) -> Result<(), HandlerError> {
    let cfg = config::read_config();
    let as_json = cli.json || cfg.json;
    let dir = config::resolve_store_dir(
        cli.dir,
        std::env::var_os("STOWAGE_DIR").map(PathBuf::from),
        &cfg,
    );

    match cli.command {
        Commands::Get(args) => cmd_get(&dir, args, as_json),
        Commands::Set(args) => cmd_set(&dir, args),
        Commands::Rm(args) => cmd_rm(&dir, args),
        Commands::List => cmd_list(&dir, as_json),
        Commands::Path => {
            println!("{}", dir.display());
            Ok(())
        }
        Commands::Watch(args) => cmd_watch(&dir, args, as_json),
    }
}

fn cmd_get(dir: &Path, args: GetArgs, as_json: bool) -> Result<(), HandlerError> {
    let store = DurableStore::open(dir)?;
    output::print_value(&args.key, store.get(&args.key).as_deref(), as_json);
    Ok(())
}

fn cmd_set(dir: &Path, args: SetArgs) -> Result<(), HandlerError> {
    // Validate before storing so a typo cannot poison the slot for every
    // cell bound to it.
    serde_json::from_str::<serde_json::Value>(&args.value)?;
    let store = DurableStore::open(dir)?;
    store.set(&args.key, &args.value)?;
    Ok(())
}

fn cmd_rm(dir: &Path, args: RmArgs) -> Result<(), HandlerError> {
    let store = DurableStore::open(dir)?;
    store.remove(&args.key)?;
    Ok(())
}

fn cmd_list(dir: &Path, as_json: bool) -> Result<(), HandlerError> {
    let store = DurableStore::open(dir)?;
    let mut keys: Vec<(String, usize)> = store
        .keys()
        .into_iter()
        .map(|key| {
            let bytes = store.get(&key).map(|raw| raw.len()).unwrap_or(0);
            (key, bytes)
        })
        .collect();
    keys.sort();
    output::print_keys(&keys, as_json);
    Ok(())
}

fn cmd_watch(dir: &Path, args: WatchArgs, as_json: bool) -> Result<(), HandlerError> {
    let store = DurableStore::open(dir)?;
    let watcher = StoreWatcher::start(store.dir())?;
    let interval = Duration::from_millis(args.interval.max(1));

    log::info!("watching {}", store.dir().display());
    loop {
        for event in watcher.poll() {
            output::print_change(&event, as_json);
        }
        std::thread::sleep(interval);
    }
}
