//! cardnotify CLI
//!
//! Renders card diffs into chat attachments and manages card documents.

use clap::{Parser, Subcommand};
use cardnotify_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cardnotify")]
#[command(about = "cardnotify - card change notifications", long_about = None)]
struct Cli {
    /// Logging profile: dev, prod or test
    #[arg(long, global = true, default_value = "dev")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a JSON diff list into attachments
    Render(commands::render::RenderArgs),
    /// Card document store operations
    Doc(commands::doc::DocArgs),
}

fn main() {
    let cli = Cli::parse();

    match Profile::parse(&cli.log) {
        Some(profile) => init(profile),
        None => {
            eprintln!("Error: unknown log profile '{}'", cli.log);
            std::process::exit(2);
        }
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Doc(args) => commands::doc::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
