pub mod attachment;
pub mod block;
pub mod diff;
pub mod document;

pub use attachment::{Attachment, AttachmentField};
pub use block::{Block, BlockType, Board};
pub use diff::{AuthorSet, ChangeKind, Diff, PropDiff};
pub use document::{CardDocument, CardDocumentInfo, CardDocumentPatch};
