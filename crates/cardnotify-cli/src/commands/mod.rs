pub mod doc;
pub mod render;
