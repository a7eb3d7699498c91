use serde::{Deserialize, Serialize};

/// Rendered chat attachment for one card change
///
/// Field names follow the chat platform's attachment payload so the value
/// can be serialized straight into a post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub pretext: String,
    pub fallback: String,
    pub title_link: String,
    #[serde(default)]
    pub fields: Vec<AttachmentField>,
}

impl Attachment {
    /// Attachment whose pretext doubles as the plain-text fallback
    pub fn with_pretext(pretext: String, title_link: String) -> Self {
        Self {
            fallback: pretext.clone(),
            pretext,
            title_link,
            fields: Vec::new(),
        }
    }
}

/// Labelled value shown below the pretext
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    /// Full-width field
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }
}
