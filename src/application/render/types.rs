use serde::{Deserialize, Serialize};

use crate::domain::document::Document;

/// Markup produced for one document, plus how many blocks made it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RenderOutput {
    /// Concatenated block markup, ready to embed.
    pub html: String,
    /// Blocks that produced markup.
    pub blocks_rendered: usize,
    /// Blocks dropped, either while decoding the document or because they
    /// produced nothing (an image without a URL, an unknown block without
    /// text).
    pub blocks_skipped: usize,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Trait exposed by the rendering pipeline. Implementations must be pure,
/// total and deterministic: the same document always yields the same markup,
/// and no input produces an error.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &Document) -> RenderOutput;
}
