//! Command-line interface definition.
use clap::Parser;
use std::path::PathBuf;

/// Version reported by `--version` and logged at startup.
pub const VERSION: &str = match option_env!("PROVISION_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Command-line entry point for the provisioning engine.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "provision",
    about = "Idempotent machine provisioning",
    version = VERSION
)]
pub struct Cli {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: search PROVISION_CONFIG, ./provision.toml,
    /// ./conf/provision.toml, ~/.config/provision/provision.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Skip steps whose name contains any of these keywords
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only steps whose name contains one of these keywords
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}
