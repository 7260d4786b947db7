//! Builder-code generation from a DOM subtree.
//!
//! One element becomes a call head, its children as positional arguments,
//! then chained setters in a fixed order:
//!
//! 1. `Type`, `Id`, `Class`, `Style`
//! 2. every other plain attribute, in source order, as `Attr(name, value)`
//! 3. directives (templated mode only): `v-if`, `v-for`, `v-model`, bindings,
//!    events
//! 4. the captured interpolation text as `Attr("v-text", ...)`

use markup5ever_rcdom::Handle;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::trace;

use crate::directive::{Directive, MARKER_TAG, TEXT_MARKER};
use crate::dom::{self, NodeKind};
use crate::error::{ConvertError, ConvertResult};
use crate::literal::quote;
use crate::naming::component_name;
use crate::walker::ContentRoot;

const PRIMARY_SETTERS: &[(&str, &str)] = &[
    ("type", "Type"),
    ("id", "Id"),
    ("class", "Class"),
    ("style", "Style"),
];

/// Attributes always written as `Attr(name, name)`, whatever their value.
const BOOLEAN_ATTRIBUTES: &[&str] = &["checked", "disabled", "required"];

/// Bindings and events with a fixed slot; others follow in source order.
const BINDING_ORDER: &[&str] = &["key", "src", "alt", "placeholder", "class", "style"];
const EVENT_ORDER: &[&str] = &["click", "input", "event"];

/// Opening of a marker element as it appears in raw-text content.
const MARKER_OPENING: &str = "<span data-v-text=\"";

/// Separator between interpolations captured from one element.
const INTERPOLATION_SEPARATOR: &str = " - ";

pub struct Emitter<'a> {
    prefix: &'a str,
    templated: bool,
}

impl<'a> Emitter<'a> {
    pub fn new(prefix: &'a str, templated: bool) -> Self {
        Self { prefix, templated }
    }

    /// Generate code for the content root.
    ///
    /// Only elements and text can be emitted; any other kind at the root is
    /// an `UnknownNodeType` failure.
    pub fn emit_root(&self, root: &ContentRoot) -> ConvertResult<String> {
        let mut out = String::new();
        match dom::kind(&root.node) {
            NodeKind::Element => self.emit_element(&root.node, &mut out)?,
            NodeKind::Text => self.emit_text(&root.node, &mut out),
            other => {
                return Err(ConvertError::UnknownNodeType {
                    message: format!("unknown node type: {:?}", other),
                    node: root.node_ref.clone(),
                })
            }
        }
        Ok(out)
    }

    /// Qualify a builder function name with the package prefix.
    pub fn qualify(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    fn emit_child(&self, node: &Handle, out: &mut String) -> ConvertResult<()> {
        match dom::kind(node) {
            NodeKind::Element => self.emit_element(node, out),
            NodeKind::Text => {
                self.emit_text(node, out);
                Ok(())
            }
            // comments, doctypes and processing instructions carry no content
            _ => Ok(()),
        }
    }

    fn emit_text(&self, node: &Handle, out: &mut String) {
        let Some(raw) = dom::text(node) else {
            return;
        };
        let text = raw.trim();
        if text.is_empty() || (self.templated && carries_marker(text)) {
            return;
        }
        let decoded = html_escape::decode_html_entities(text);
        out.push_str(&self.qualify("Text"));
        out.push('(');
        out.push_str(&quote(&decoded));
        out.push(')');
    }

    fn emit_element(&self, node: &Handle, out: &mut String) -> ConvertResult<()> {
        if self.templated {
            if let Some(expr) = marker_expression(node) {
                setter(out, "Attr", &["v-text", expr.as_str()]);
                return Ok(());
            }
        }

        let tag = dom::tag_name(node).unwrap_or_default();
        let name = component_name(&tag);
        trace!(tag = %tag, "emitting element");

        let children = dom::children(node);
        out.push_str(&self.qualify(&name));
        out.push('(');
        if !(self.templated && children.iter().any(is_marker)) {
            let mut first = true;
            for child in children.iter().filter(|c| self.is_emitted_child(c)) {
                if !first {
                    out.push_str(", ");
                }
                self.emit_child(child, out)?;
                first = false;
            }
        }
        if children.is_empty() && tag == "input" {
            out.push_str("\"\"");
        }
        out.push(')');

        let mut attrs = AttributeMap::collect(dom::attributes(node));
        let mut interpolation = Interpolation::default();
        if self.templated {
            if let Some(existing) = attrs.take("v-text") {
                interpolation.push(&existing);
            }
            for child in &children {
                interpolation.capture(child);
            }
        }

        for (key, method) in PRIMARY_SETTERS {
            if let Some(value) = attrs.take(key) {
                setter(out, method, &[value.as_str()]);
            }
        }

        let directives = if self.templated {
            take_directives(&mut attrs)
        } else {
            Vec::new()
        };

        for (key, value) in attrs.into_entries() {
            plain_attribute(out, &key, &value);
        }

        for (directive, value) in directives {
            setter(out, "Attr", &[directive.source_name().as_str(), value.as_str()]);
        }

        if !interpolation.is_empty() {
            setter(out, "Attr", &["v-text", interpolation.text.as_str()]);
        }
        Ok(())
    }

    fn is_emitted_child(&self, node: &Handle) -> bool {
        match dom::kind(node) {
            NodeKind::Element => true,
            NodeKind::Text => dom::text(node)
                .map(|t| !t.trim().is_empty() && !(self.templated && carries_marker(&t)))
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Per-element attribute map. Names are unique and keep the position of
/// their first occurrence; a repeated name overwrites the value.
#[derive(Debug, Default)]
struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    fn collect(pairs: Vec<(String, String)>) -> Self {
        let mut map = AttributeMap::default();
        for (key, value) in pairs {
            match map.entries.iter().position(|(k, _)| *k == key) {
                Some(i) => map.entries[i].1 = value,
                None => map.entries.push((key, value)),
            }
        }
        map
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    fn take_where(&mut self, pred: impl Fn(&str) -> bool) -> Vec<(String, String)> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(k, _)| pred(k));
        self.entries = kept;
        taken
    }

    fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}

/// Text captured from interpolation markers among an element's children.
#[derive(Debug, Default)]
struct Interpolation {
    text: String,
    count: usize,
}

impl Interpolation {
    fn push(&mut self, expr: &str) {
        if self.count > 0 {
            self.text.push_str(INTERPOLATION_SEPARATOR);
        }
        self.text.push_str(expr);
        self.count += 1;
    }

    fn capture(&mut self, child: &Handle) {
        if let Some(expr) = marker_expression(child) {
            self.push(&expr);
            return;
        }
        // Markers inside raw-text elements (textarea, title) reach the tree as
        // text rather than as elements.
        if let Some(text) = dom::text(child) {
            if carries_marker(&text) {
                for expr in marker_text_expressions(&text) {
                    self.push(&expr);
                }
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn take_directives(attrs: &mut AttributeMap) -> Vec<(Directive, String)> {
    let mut seen = HashSet::new();
    let mut directives: Vec<(Directive, String)> = attrs
        .take_where(|name| Directive::classify(name).is_some())
        .into_iter()
        .filter_map(|(name, value)| Directive::classify(&name).map(|d| (d, value)))
        .filter(|(d, _)| seen.insert(d.source_name()))
        .collect();
    directives.sort_by_key(|(d, _)| directive_rank(d));
    directives
}

fn directive_rank(directive: &Directive) -> (usize, usize) {
    fn slot(order: &[&str], arg: &str) -> usize {
        order.iter().position(|k| *k == arg).unwrap_or(order.len())
    }
    match directive {
        Directive::If => (0, 0),
        Directive::For => (1, 0),
        Directive::Model => (2, 0),
        Directive::Bind(arg) => (3, slot(BINDING_ORDER, arg)),
        Directive::On(arg) => (4, slot(EVENT_ORDER, arg)),
    }
}

fn plain_attribute(out: &mut String, key: &str, value: &str) {
    let boolean = BOOLEAN_ATTRIBUTES.contains(&key)
        || (!key.starts_with("data-") && (value.is_empty() || value == key));
    if boolean {
        setter(out, "Attr", &[key, key]);
    } else {
        setter(out, "Attr", &[key, value]);
    }
}

fn setter(out: &mut String, method: &str, args: &[&str]) {
    out.push('.');
    out.push_str(method);
    out.push('(');
    let quoted: Vec<String> = args.iter().map(|a| quote(a)).collect();
    out.push_str(&quoted.join(", "));
    out.push(')');
}

fn is_marker(node: &Handle) -> bool {
    marker_expression(node).is_some()
}

fn marker_expression(node: &Handle) -> Option<String> {
    if dom::is_element(node, MARKER_TAG) {
        dom::attribute(node, TEXT_MARKER)
    } else {
        None
    }
}

/// Only the full marker opening counts; prose that merely mentions the
/// attribute name is ordinary text.
fn carries_marker(text: &str) -> bool {
    text.contains(MARKER_OPENING)
}

fn marker_text_expressions(text: &str) -> Vec<String> {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = MARKER_REGEX.get_or_init(|| Regex::new(r#"<span data-v-text="([^"]*)""#).unwrap());
    re.captures_iter(text)
        .map(|caps| html_escape::decode_html_entities(&caps[1]).into_owned())
        .collect()
}
