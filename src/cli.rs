use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "deck-tracker", about = "Deck Tracker - records spoken card names")]
pub struct CliArgs {
    /// Settings file (JSON); defaults are used when it is missing
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Alias dictionary (JSON object mapping alias to card name)
    #[arg(long)]
    pub aliases: Option<PathBuf>,

    /// File holding the saved track
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Start listening as soon as the tracker is ready
    #[arg(long)]
    pub autostart: bool,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,
}
