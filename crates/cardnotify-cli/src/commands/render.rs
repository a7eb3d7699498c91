//! Render command
//!
//! Usage: cardnotify render --diffs <FILE> [--config <FILE>] [--output <FILE>] [--include-comments]

use std::path::PathBuf;

use cardnotify_core::{ConvertOptions, Diff, NotifyConfig, NotifyEngine};
use clap::Args;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON file holding an array of diffs
    #[arg(long)]
    pub diffs: PathBuf,

    /// TOML configuration (default: built-in Korean labels and templates)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also report added and deleted comments
    #[arg(long)]
    pub include_comments: bool,
}

/// Execute render command
///
/// Attachments that rendered are written even when some diffs failed; the
/// aggregated failure is then returned as the command error.
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => NotifyConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => NotifyConfig::default(),
    };

    let diffs = Diff::list_from_json(&std::fs::read_to_string(&args.diffs)?)?;

    let options = ConvertOptions::from_config(&config);
    let options = if args.include_comments {
        options.with_comment_changes(true)
    } else {
        options
    };
    let engine = NotifyEngine::new(options);

    let (attachments, result) = engine.convert(&diffs).into_parts();
    let json = serde_json::to_string_pretty(&attachments)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, json)?;
        println!(
            "✓ Rendered {} attachment(s) to {}",
            attachments.len(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    result?;
    Ok(())
}
