//! Mapping from arbitrary HTML tags to the tags Telegraph accepts.

/// Tags Telegraph accepts in page content.
pub const SUPPORTED_TAGS: [&str; 24] = [
    "a",
    "aside",
    "b",
    "blockquote",
    "br",
    "code",
    "em",
    "figcaption",
    "figure",
    "h3",
    "h4",
    "hr",
    "i",
    "iframe",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "s",
    "strong",
    "u",
    "ul",
    "video",
];

/// Elements dropped together with everything inside them.
pub const DROPPED_TAGS: [&str; 2] = ["script", "style"];

/// Tag used for anything without a closer supported equivalent.
pub const FALLBACK_TAG: &str = "p";

pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_dropped(tag: &str) -> bool {
    DROPPED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Maps any tag name to the semantically closest supported tag.
pub fn map_tag(tag: &str) -> &'static str {
    match tag.to_ascii_lowercase().as_str() {
        // h3 is the highest heading Telegraph renders
        "h1" | "h2" => "h3",
        "b" => "strong",
        "i" => "em",
        "div" | "span" => FALLBACK_TAG,
        other => SUPPORTED_TAGS
            .iter()
            .find(|t| **t == other)
            .copied()
            .unwrap_or(FALLBACK_TAG),
    }
}
