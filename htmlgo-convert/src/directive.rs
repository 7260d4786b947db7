//! Templating directives: detection, pre-parse rewriting, and classification
//! of attribute names.
//!
//! Interpolation spans (`{{ expr }}`) are not markup a standard parser can
//! keep, so they are rewritten into marker elements before parsing. Directive
//! attributes (`v-if`, `:src`, `@click`, ...) are renamed to `data-v-*` names
//! while scanning start tags. Values and comments are never touched.

use std::borrow::Cow;

/// Substrings that switch the converter into templated mode.
pub const TRIGGERS: &[&str] = &[
    "v-if", "v-for", "v-model", "v-bind", "v-on", ":", "@", "{{", " }}",
];

/// Attribute carried by interpolation marker elements.
pub const TEXT_MARKER: &str = "data-v-text";

/// Tag of interpolation marker elements.
pub const MARKER_TAG: &str = "span";

const ENCODED_BIND: &str = "data-v-bind-";
const ENCODED_ON: &str = "data-v-on-";

/// Returns true if `html` contains any templating trigger.
pub fn is_templated(html: &str) -> bool {
    TRIGGERS.iter().any(|t| html.contains(t))
}

/// A directive attribute, independent of how it was spelled in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    If,
    For,
    Model,
    Bind(String),
    On(String),
}

impl Directive {
    /// Classify an attribute name. Both the source spellings (`v-if`,
    /// `v-bind:src`, `:src`, `v-on:click`, `@click`) and the rewritten
    /// `data-v-*` spellings are recognised.
    pub fn classify(name: &str) -> Option<Directive> {
        match name {
            "v-if" | "data-v-if" => return Some(Directive::If),
            "v-for" | "data-v-for" => return Some(Directive::For),
            "v-model" | "data-v-model" => return Some(Directive::Model),
            _ => {}
        }

        let (bind, on) = if let Some(rest) = name.strip_prefix(ENCODED_BIND) {
            (Some(rest), None)
        } else if let Some(rest) = name.strip_prefix(ENCODED_ON) {
            (None, Some(rest))
        } else if let Some(rest) = name.strip_prefix("v-bind:") {
            (Some(rest), None)
        } else if let Some(rest) = name.strip_prefix("v-on:") {
            (None, Some(rest))
        } else if let Some(rest) = name.strip_prefix(':') {
            (Some(rest), None)
        } else if let Some(rest) = name.strip_prefix('@') {
            (None, Some(rest))
        } else {
            (None, None)
        };

        match (bind, on) {
            (Some(arg), _) if !arg.is_empty() => Some(Directive::Bind(arg.to_string())),
            (_, Some(arg)) if !arg.is_empty() => Some(Directive::On(arg.to_string())),
            _ => None,
        }
    }

    /// The attribute name the preprocessor writes for this directive.
    pub fn encoded_name(&self) -> String {
        match self {
            Directive::If => "data-v-if".to_string(),
            Directive::For => "data-v-for".to_string(),
            Directive::Model => "data-v-model".to_string(),
            Directive::Bind(arg) => format!("{ENCODED_BIND}{arg}"),
            Directive::On(arg) => format!("{ENCODED_ON}{arg}"),
        }
    }

    /// The source spelling, used in generated code.
    pub fn source_name(&self) -> String {
        match self {
            Directive::If => "v-if".to_string(),
            Directive::For => "v-for".to_string(),
            Directive::Model => "v-model".to_string(),
            Directive::Bind(arg) => format!(":{arg}"),
            Directive::On(arg) => format!("@{arg}"),
        }
    }
}

/// Rewrite templating syntax into plain attributes.
///
/// Input without any trigger substring is returned borrowed and unchanged.
pub fn preprocess(html: &str) -> Cow<'_, str> {
    if !is_templated(html) {
        return Cow::Borrowed(html);
    }
    let mut rewriter = Rewriter::new(html);
    rewriter.run();
    Cow::Owned(rewriter.out)
}

/// Build the marker element that replaces one interpolation span.
pub fn interpolation_marker(expr: &str) -> String {
    format!(
        r#"<{MARKER_TAG} {TEXT_MARKER}="{}"></{MARKER_TAG}>"#,
        html_escape::encode_double_quoted_attribute(expr)
    )
}

struct Rewriter<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: String,
}

impl<'a> Rewriter<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            out: String::with_capacity(src.len() + 32),
        }
    }

    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let rest = &self.src[self.pos..];
            if rest.starts_with("<!--") {
                self.copy_through("-->");
            } else if rest.starts_with('<')
                && self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_alphabetic)
            {
                self.start_tag();
            } else if rest.starts_with("{{") {
                self.interpolation();
            } else {
                self.text();
            }
        }
    }

    /// Copy plain text up to the next byte that could open a tag or an
    /// interpolation. Always advances at least one byte.
    fn text(&mut self) {
        let start = self.pos;
        let mut end = start + 1;
        while end < self.bytes.len() && !matches!(self.bytes[end], b'<' | b'{') {
            end += 1;
        }
        // `<` and `{` are ASCII, so `end` is always a char boundary.
        self.out.push_str(&self.src[start..end]);
        self.pos = end;
    }

    fn copy_through(&mut self, terminator: &str) {
        let start = self.pos;
        let end = match self.src[start..].find(terminator) {
            Some(i) => start + i + terminator.len(),
            None => self.bytes.len(),
        };
        self.out.push_str(&self.src[start..end]);
        self.pos = end;
    }

    fn interpolation(&mut self) {
        let body_start = self.pos + 2;
        let close = self.src[body_start..].find('}').map(|i| body_start + i);
        match close {
            Some(close) if self.src[close..].starts_with("}}") => {
                let expr = &self.src[body_start..close];
                self.out.push_str(&interpolation_marker(expr));
                self.pos = close + 2;
            }
            _ => {
                self.out.push_str("{{");
                self.pos = body_start;
            }
        }
    }

    fn start_tag(&mut self) {
        // `<` and the tag name
        let name_start = self.pos;
        self.pos += 1;
        self.skip_while(|b| !b.is_ascii_whitespace() && b != b'/' && b != b'>');
        self.out.push_str(&self.src[name_start..self.pos]);

        while self.pos < self.bytes.len() {
            let ws_start = self.pos;
            self.skip_while(|b| b.is_ascii_whitespace());
            self.out.push_str(&self.src[ws_start..self.pos]);

            match self.bytes.get(self.pos) {
                None => return,
                Some(b'>') => {
                    self.out.push('>');
                    self.pos += 1;
                    return;
                }
                Some(b'/') => {
                    self.out.push('/');
                    self.pos += 1;
                    continue;
                }
                Some(_) => self.attribute(),
            }
        }
    }

    fn attribute(&mut self) {
        let name_start = self.pos;
        // An attribute name may begin with `=`; everything after that stops at
        // whitespace, `/`, `>` or `=`.
        self.pos += 1;
        self.skip_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>' | b'='));
        let name = &self.src[name_start..self.pos];
        match Directive::classify(name) {
            Some(directive) if !name.starts_with("data-") => {
                self.out.push_str(&directive.encoded_name());
            }
            _ => self.out.push_str(name),
        }

        let after_name = self.pos;
        self.skip_while(|b| b.is_ascii_whitespace());
        if self.bytes.get(self.pos) != Some(&b'=') {
            // Boolean attribute; leave the whitespace for the tag loop.
            self.pos = after_name;
            return;
        }
        self.pos += 1;
        self.skip_while(|b| b.is_ascii_whitespace());
        match self.bytes.get(self.pos).copied() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                self.skip_while(|b| b != quote);
                if self.pos < self.bytes.len() {
                    self.pos += 1;
                }
            }
            _ => self.skip_while(|b| !b.is_ascii_whitespace() && b != b'>'),
        }
        self.out.push_str(&self.src[after_name..self.pos]);
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }
}
