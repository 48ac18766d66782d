use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stow", about = concat!("stow v", env!("CARGO_PKG_VERSION"), " - inspect and edit stowage stores"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different store directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the raw stored value for a key
    Get(GetArgs),
    /// Store a JSON value under a key
    Set(SetArgs),
    /// Remove a key
    Rm(RmArgs),
    /// List stored keys
    List,
    /// Print the store directory path
    Path,
    /// Watch the store and print changes made by other processes
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct GetArgs {
    /// Storage key
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Storage key
    pub key: String,
    /// Value, as JSON text (e.g. `5`, `"text"`, `{"a":1}`)
    pub value: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Storage key
    pub key: String,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 200)]
    pub interval: u64,
}
