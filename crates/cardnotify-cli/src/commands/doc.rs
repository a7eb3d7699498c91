//! Card document commands
//!
//! Usage: cardnotify doc <put|get|info|delete> --db <FILE> ...

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cardnotify_core::model::CardDocument;
use cardnotify_store::{db, DocumentRepo};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct DocArgs {
    /// SQLite database file
    #[arg(long, global = true, default_value = ".cardnotify/documents.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: DocCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Store a snapshot file as a card's document
    Put(PutArgs),
    /// Print a card's snapshot, base64-encoded
    Get(CardArgs),
    /// Print a card's document metadata as JSON
    Info(CardArgs),
    /// Delete a card's documents
    Delete(CardArgs),
}

#[derive(Debug, Args)]
pub struct PutArgs {
    #[arg(long)]
    pub card: String,

    #[arg(long)]
    pub board: String,

    /// Document id (default: the card id)
    #[arg(long)]
    pub doc: Option<String>,

    /// File holding the snapshot bytes
    #[arg(long)]
    pub snapshot: PathBuf,

    /// User recorded as author of the change
    #[arg(long, default_value = "system")]
    pub user: String,
}

#[derive(Debug, Args)]
pub struct CardArgs {
    #[arg(long)]
    pub card: String,
}

/// Execute doc command
pub fn execute(args: DocArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = args.db.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_and_migrate(&args.db)?;

    match args.command {
        DocCommand::Put(put) => {
            let snapshot = std::fs::read(&put.snapshot)?;
            let doc_id = put.doc.unwrap_or_else(|| put.card.clone());
            let doc = CardDocument::new(doc_id, put.card, put.board, snapshot, put.user);
            DocumentRepo::upsert(&conn, &doc)?;
            println!("✓ Stored document {} for card {}", doc.doc_id, doc.card_id);
        }
        DocCommand::Get(card) => {
            let doc = DocumentRepo::get_by_card_id(&conn, &card.card)?;
            println!("{}", STANDARD.encode(doc.snapshot.unwrap_or_default()));
        }
        DocCommand::Info(card) => {
            let info = DocumentRepo::get_info_by_card_id(&conn, &card.card)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        DocCommand::Delete(card) => {
            let deleted = DocumentRepo::delete_by_card_id(&conn, &card.card)?;
            println!("✓ Deleted {} document(s) for card {}", deleted, card.card);
        }
    }

    Ok(())
}
