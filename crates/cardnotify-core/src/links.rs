//! Link-building capability used by templates and attachment title links.

use crate::model::{Block, Board};

/// Builds markdown-ready links to cards and boards
///
/// Implementations must be cheap and infallible: a link that cannot be
/// built degrades to plain text rather than failing the notification.
pub trait LinkBuilder: Send + Sync {
    /// Link for `block`, which lives on `card` within `board`
    fn card_link(&self, block: Option<&Block>, board: Option<&Board>, card: Option<&Block>)
        -> String;

    fn board_link(&self, board: Option<&Board>) -> String;
}

/// Default builder: backticked titles, no hyperlinks
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainLinkBuilder;

impl LinkBuilder for PlainLinkBuilder {
    fn card_link(
        &self,
        block: Option<&Block>,
        _board: Option<&Board>,
        card: Option<&Block>,
    ) -> String {
        let title = block.or(card).map_or("", |b| b.title.as_str());
        format!("`{}`", title)
    }

    fn board_link(&self, board: Option<&Board>) -> String {
        format!("`{}`", board.map_or("", |b| b.title.as_str()))
    }
}

/// Builder producing absolute URLs under a server root
///
/// Cards resolve to `{root}/team/{team}/{board}/0/{card}` and boards to
/// `{root}/team/{team}/{board}`.
#[derive(Debug, Clone)]
pub struct ServerLinkBuilder {
    server_root: String,
}

impl ServerLinkBuilder {
    pub fn new(server_root: impl Into<String>) -> Self {
        let server_root = server_root.into();
        Self {
            server_root: server_root.trim_end_matches('/').to_string(),
        }
    }
}

impl LinkBuilder for ServerLinkBuilder {
    fn card_link(
        &self,
        block: Option<&Block>,
        board: Option<&Board>,
        card: Option<&Block>,
    ) -> String {
        let (team_id, board_id) = board.map_or(("", ""), |b| (b.team_id.as_str(), b.id.as_str()));
        let card_id = card.or(block).map_or("", |b| b.id.as_str());
        format!(
            "{}/team/{}/{}/0/{}",
            self.server_root, team_id, board_id, card_id
        )
    }

    fn board_link(&self, board: Option<&Board>) -> String {
        let (team_id, board_id) = board.map_or(("", ""), |b| (b.team_id.as_str(), b.id.as_str()));
        format!("{}/team/{}/{}", self.server_root, team_id, board_id)
    }
}
