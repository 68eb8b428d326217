//! Block-structured rich-text documents as produced by the task editor.
//!
//! Parsing is deliberately lenient: a block without a `type` tag or without a
//! `data` payload is dropped, and a payload that is not an object is treated
//! as empty. Nothing here ever fails; malformed input degrades to less output.

use serde_json::{Map, Value};

/// Structural type of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Header,
    List,
    Table,
    Image,
    Delimiter,
    Code,
    Quote,
    /// Any tag the renderer has no dedicated rule for.
    Unknown(String),
}

impl BlockKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "header" => Self::Header,
            "list" => Self::List,
            "table" => Self::Table,
            "image" => Self::Image,
            "delimiter" => Self::Delimiter,
            "code" => Self::Code,
            "quote" => Self::Quote,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Type-specific payload of a block with typed, defaulting accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockData(Map<String, Value>);

impl BlockData {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field, or `""` when missing or not a string.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Array field, or an empty slice when missing or not an array.
    pub fn array(&self, key: &str) -> &[Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Boolean flag; only JSON `true` counts as set.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Integer field. Accepts JSON numbers (fractions truncated) and numeric strings.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub data: BlockData,
}

impl Block {
    /// Build a block from raw JSON; `None` when the block must be skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .filter(|tag| !tag.is_empty())?;
        let data = match object.get("data") {
            None | Some(Value::Null) => return None,
            Some(Value::Object(fields)) => BlockData::new(fields.clone()),
            Some(_) => BlockData::default(),
        };

        Some(Self {
            kind: BlockKind::from_tag(tag),
            data,
        })
    }
}

/// Ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    skipped: usize,
}

impl Document {
    /// Accepts `{ "blocks": [...] }` or a bare array of blocks.
    ///
    /// Anything else yields an empty document.
    pub fn from_value(value: &Value) -> Self {
        let raw_blocks = match value {
            Value::Array(items) => items.as_slice(),
            Value::Object(object) => object
                .get("blocks")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        };

        let blocks: Vec<Block> = raw_blocks.iter().filter_map(Block::from_value).collect();
        let skipped = raw_blocks.len() - blocks.len();
        Self { blocks, skipped }
    }

    /// True for a bare array or an object carrying a `blocks` array.
    pub fn is_block_document(value: &Value) -> bool {
        match value {
            Value::Array(_) => true,
            Value::Object(object) => object.get("blocks").is_some_and(Value::is_array),
            _ => false,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of raw blocks dropped while parsing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
