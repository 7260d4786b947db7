//! # htmlgo-convert
//!
//! Turns HTML fragments, including Vue-style templates, into chained
//! builder-function code for the `htmlgo` Go package, and reads such code
//! back into HTML.
//!
//! ## Features
//! - Full HTML5 parsing with error recovery
//! - Vue directives (`v-if`, `v-for`, `v-model`, `:prop`, `@event`) and
//!   `{{ }}` interpolation carried through as `Attr` calls
//! - Typed errors that point at the offending node
//! - Configurable package qualifier
//! - Static builder-code to HTML conversion
//!
//! ## Example
//! ```
//! use htmlgo_convert::convert_html_to_code;
//!
//! let code = convert_html_to_code(r#"<div class="container">Hello</div>"#).unwrap();
//! assert_eq!(code, r#"htmlgo.Div(htmlgo.Text("Hello")).Class("container")"#);
//! ```
//!
//! ## Example: custom qualifier
//! ```
//! use htmlgo_convert::Converter;
//!
//! let code = Converter::with_package_prefix("h").convert("<br>").unwrap();
//! assert_eq!(code, "h.Br()");
//! ```

pub mod directive;
pub mod dom;
pub mod emitter;
pub mod error;
pub mod literal;
pub mod naming;
pub mod prefix;
pub mod reverse;
pub mod walker;

use tracing::debug;

use crate::emitter::Emitter;

// --- Core types ---
pub use error::{ConvertError, ConvertResult, ErrorKind, NodeRef, ReverseError};
pub use prefix::{replace_package_prefix, DEFAULT_PACKAGE_PREFIX};
pub use reverse::builder_to_html;

/// Marker the pre-parse lint rejects outright.
const UNCLOSED_MARKER: &str = "<unclosed>";

/// HTML to builder-code converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    package_prefix: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_package_prefix(DEFAULT_PACKAGE_PREFIX)
    }

    /// Qualify every generated call with `prefix`. An empty prefix leaves
    /// calls unqualified.
    pub fn with_package_prefix(prefix: impl Into<String>) -> Self {
        Self {
            package_prefix: prefix.into(),
        }
    }

    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    /// Convert an HTML fragment or document to builder code.
    ///
    /// Blank input yields the bare qualifier (`htmlgo.`), input without any
    /// markup becomes a single `Text` call.
    pub fn convert(&self, html: &str) -> ConvertResult<String> {
        let trimmed = html.trim();
        if trimmed.is_empty() {
            return Ok(self.emitter(false).qualify(""));
        }
        if !trimmed.contains('<') {
            let emitter = self.emitter(false);
            return Ok(format!(
                "{}({})",
                emitter.qualify("Text"),
                literal::quote(trimmed)
            ));
        }
        if html.contains(UNCLOSED_MARKER) {
            return Err(ConvertError::InvalidHtml {
                message: "unclosed tag detected".to_string(),
            });
        }

        let templated = directive::is_templated(html);
        if templated {
            debug!("template syntax detected, rewriting directives");
        }
        let source = directive::preprocess(html);
        let document = dom::parse(&source)?;
        let root = walker::find_content(Some(&document.document))?;
        self.emitter(templated).emit_root(&root)
    }

    fn emitter(&self, templated: bool) -> Emitter<'_> {
        Emitter::new(&self.package_prefix, templated)
    }
}

/// Convert with the default `htmlgo` qualifier.
pub fn convert_html_to_code(html: &str) -> ConvertResult<String> {
    Converter::new().convert(html)
}
