//! Thin read-only view over the html5ever / rcdom tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::error::ConvertResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype,
    Text,
    Comment,
    Element,
    ProcessingInstruction,
}

/// Parse `html` into a full document tree.
pub fn parse(html: &str) -> ConvertResult<RcDom> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    for error in &dom.errors {
        debug!(%error, "html parser recovered");
    }
    Ok(dom)
}

pub fn kind(node: &Handle) -> NodeKind {
    match node.data {
        NodeData::Document => NodeKind::Document,
        NodeData::Doctype { .. } => NodeKind::Doctype,
        NodeData::Text { .. } => NodeKind::Text,
        NodeData::Comment { .. } => NodeKind::Comment,
        NodeData::Element { .. } => NodeKind::Element,
        NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
    }
}

/// Local name of an element, `None` for every other kind.
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

/// Attributes of an element as `(name, value)` pairs in source order.
pub fn attributes(node: &Handle) -> Vec<(String, String)> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn attribute(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Raw character data of a text node.
pub fn text(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Text node whose content is not just whitespace.
pub fn is_content_text(node: &Handle) -> bool {
    text(node).is_some_and(|t| !t.trim().is_empty())
}

/// Child nodes in document order. A `<template>` element yields the children
/// of its content fragment.
pub fn children(node: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        template_contents, ..
    } = &node.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            return contents.children.borrow().clone();
        }
    }
    node.children.borrow().clone()
}

/// Short label used in diagnostics.
pub fn label(node: &Handle) -> String {
    match &node.data {
        NodeData::Document => "#document".to_string(),
        NodeData::Doctype { .. } => "#doctype".to_string(),
        NodeData::Text { .. } => "#text".to_string(),
        NodeData::Comment { .. } => "#comment".to_string(),
        NodeData::Element { name, .. } => format!("<{}>", name.local),
        NodeData::ProcessingInstruction { .. } => "#processing-instruction".to_string(),
    }
}
