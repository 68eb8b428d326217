//! Markup vocabulary of the block renderer: the inline tag allow-list and the
//! utility classes attached to every emitted element.

/// Inline tags that survive as live markup inside paragraph, header, list,
/// quote and caption text.
pub(crate) const INLINE_ALLOWED_TAGS: [&str; 8] =
    ["b", "strong", "i", "em", "u", "br", "code", "span"];

/// Allow-listed tags without content or closing tag.
pub(crate) const INLINE_VOID_TAGS: [&str; 1] = ["br"];

pub(crate) const PARAGRAPH_CLASS: &str = "mb-2 break-words overflow-wrap-anywhere";

pub(crate) const HEADER_L1_CLASS: &str = "text-2xl font-bold mb-3 mt-4 break-words overflow-wrap-anywhere";
pub(crate) const HEADER_L2_CLASS: &str = "text-xl font-bold mb-2 mt-3 break-words overflow-wrap-anywhere";
pub(crate) const HEADER_MINOR_CLASS: &str =
    "text-lg font-semibold mb-2 mt-2 break-words overflow-wrap-anywhere";

pub(crate) const ORDERED_LIST_CLASS: &str = "mb-2 ml-4 list-decimal break-words";
pub(crate) const UNORDERED_LIST_CLASS: &str = "mb-2 ml-4 list-disc break-words";
pub(crate) const LIST_ITEM_CLASS: &str = "mb-1 break-words overflow-wrap-anywhere";

pub(crate) const TABLE_WRAPPER_CLASS: &str = "overflow-x-auto my-3";
pub(crate) const TABLE_CLASS: &str =
    "min-w-full border-collapse border border-gray-300 text-sm break-words";
pub(crate) const TABLE_HEAD_CELL_CLASS: &str = "border border-gray-300 px-3 py-2 bg-gray-100 font-semibold text-left break-words overflow-wrap-anywhere";
pub(crate) const TABLE_CELL_CLASS: &str =
    "border border-gray-300 px-3 py-2 break-words overflow-wrap-anywhere";

pub(crate) const IMAGE_WRAPPER_CLASS: &str = "my-3";
pub(crate) const IMAGE_CLASS: &str = "max-w-full h-auto rounded-lg";
pub(crate) const IMAGE_CAPTION_CLASS: &str = "text-sm text-gray-600 italic mt-1";

pub(crate) const DELIMITER_HTML: &str = "<hr class=\"my-4 border-gray-300\" />";

pub(crate) const CODE_PRE_CLASS: &str = "bg-gray-100 p-3 rounded-lg overflow-x-auto my-2";
pub(crate) const CODE_CLASS: &str = "text-sm";

pub(crate) const QUOTE_CLASS: &str = "border-l-4 border-blue-500 pl-4 my-3 italic text-gray-700 break-words";
pub(crate) const QUOTE_TEXT_CLASS: &str = "break-words overflow-wrap-anywhere";
pub(crate) const QUOTE_CITE_CLASS: &str = "text-sm text-gray-600 break-words overflow-wrap-anywhere";

pub(crate) const MIN_HEADER_LEVEL: i64 = 1;
pub(crate) const MAX_HEADER_LEVEL: i64 = 6;

pub(crate) fn header_class(level: i64) -> &'static str {
    match level {
        1 => HEADER_L1_CLASS,
        2 => HEADER_L2_CLASS,
        _ => HEADER_MINOR_CLASS,
    }
}
