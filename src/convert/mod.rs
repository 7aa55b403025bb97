//! HTML to Telegraph page conversion.
//!
//! Metadata (title, author, description) comes from `<title>` and
//! `<meta name=..>` elements; content comes from the children of `<body>`,
//! rewritten into the restricted node tree Telegraph accepts.

mod tags;

use anyhow::Result;
use log::debug;
use scraper::{ElementRef, Html, Node as HtmlNode, Selector};
use std::collections::HashMap;

use crate::error::ConvertError;
use crate::node::Node;
use crate::telegraph::Page;

pub use tags::{DROPPED_TAGS, FALLBACK_TAG, SUPPORTED_TAGS, is_dropped, is_supported, map_tag};

/// Attributes kept on converted elements.
const KEPT_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Metadata that takes precedence over whatever the document declares.
///
/// Empty strings are treated as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlToPageOptions {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub description: Option<String>,
}

/// Converts an HTML document into a page carrying its metadata and content.
///
/// A document without `<body>` content yields an empty content list; input
/// without any markup is an error.
pub fn html_to_page(html: &str, options: Option<&HtmlToPageOptions>) -> Result<Page> {
    if html.trim().is_empty() {
        return Err(ConvertError::EmptyDocument.into());
    }

    let document = Html::parse_document(html);
    let mut page = Page::default();

    extract_metadata(&document, &mut page)?;
    if let Some(options) = options {
        apply_overrides(&mut page, options);
    }

    let body = selector("body")?;
    let content = match document.select(&body).next() {
        Some(body) => convert_children(body),
        None => Vec::new(),
    };
    debug!(
        "Converted HTML into {} top-level nodes (title {:?})",
        content.len(),
        page.title
    );
    page.content = Some(content);

    Ok(page)
}

/// Converts the children of an element; text is kept verbatim.
pub fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        match child.value() {
            HtmlNode::Text(text) => {
                if !text.is_empty() {
                    nodes.push(Node::text(&**text));
                }
            }
            HtmlNode::Element(_) => {
                if let Some(node) = ElementRef::wrap(child).and_then(convert_element) {
                    nodes.push(node);
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>) -> Option<Node> {
    let name = element.value().name();
    if is_dropped(name) {
        return None;
    }

    let attrs: HashMap<String, String> = KEPT_ATTRIBUTES
        .iter()
        .filter_map(|key| {
            element
                .value()
                .attr(key)
                .map(|value| (key.to_string(), value.to_string()))
        })
        .collect();

    Some(Node::element_with(
        map_tag(name),
        attrs,
        convert_children(element),
    ))
}

fn extract_metadata(document: &Html, page: &mut Page) -> Result<()> {
    let title = selector("title")?;
    if let Some(element) = document.select(&title).next() {
        page.title = element.text().collect();
    }

    let meta = selector("meta[name]")?;
    for element in document.select(&meta) {
        let value = element.value();
        let (Some(name), Some(content)) = (value.attr("name"), value.attr("content")) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        let slot = match name.to_ascii_lowercase().as_str() {
            "author" => &mut page.author_name,
            "url" => &mut page.author_url,
            "description" => &mut page.description,
            _ => continue,
        };
        if slot.is_empty() {
            *slot = content.to_string();
        }
    }
    Ok(())
}

fn apply_overrides(page: &mut Page, options: &HtmlToPageOptions) {
    let overrides = [
        (&options.title, &mut page.title),
        (&options.author_name, &mut page.author_name),
        (&options.author_url, &mut page.author_url),
        (&options.description, &mut page.description),
    ];
    for (value, slot) in overrides {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            *slot = value.to_string();
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ConvertError::InvalidSelector(format!("{}: {:?}", css, e)).into())
}
