use super::Parser;

/// Marketplace delta-search watcher.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Path to a settings file, overriding the compiled-in default.
    #[arg(long)]
    pub settings: Option<String>,
}
