use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Non-owning handle to a DOM node, used to point at the offending node in
/// an error after the parsed tree has been dropped.
///
/// `path` holds the child index taken at every level, starting at the
/// document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub path: Vec<usize>,
    pub label: String,
}

impl NodeRef {
    pub fn new(path: &[usize], label: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            label: label.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at /", self.label)?;
        let segments: Vec<String> = self.path.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", segments.join("/"))
    }
}

/// The failure classes a conversion can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "InvalidHTML")]
    InvalidHtml,
    ParseError,
    EmptyNode,
    EmptyBody,
    NoBody,
    NoContent,
    UnknownNodeType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidHtml => "InvalidHTML",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::EmptyNode => "EmptyNode",
            ErrorKind::EmptyBody => "EmptyBody",
            ErrorKind::NoBody => "NoBody",
            ErrorKind::NoContent => "NoContent",
            ErrorKind::UnknownNodeType => "UnknownNodeType",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("InvalidHTML: {message}")]
    InvalidHtml { message: String },

    #[error("ParseError: {message}")]
    Parse { message: String },

    #[error("EmptyNode: {message}")]
    EmptyNode { message: String },

    #[error("EmptyBody: {message}")]
    EmptyBody { message: String, node: NodeRef },

    #[error("NoBody: {message}")]
    NoBody { message: String, node: NodeRef },

    #[error("NoContent: {message}")]
    NoContent { message: String, node: NodeRef },

    #[error("UnknownNodeType: {message}")]
    UnknownNodeType { message: String, node: NodeRef },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidHtml { .. } => ErrorKind::InvalidHtml,
            ConvertError::Parse { .. } => ErrorKind::ParseError,
            ConvertError::EmptyNode { .. } => ErrorKind::EmptyNode,
            ConvertError::EmptyBody { .. } => ErrorKind::EmptyBody,
            ConvertError::NoBody { .. } => ErrorKind::NoBody,
            ConvertError::NoContent { .. } => ErrorKind::NoContent,
            ConvertError::UnknownNodeType { .. } => ErrorKind::UnknownNodeType,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ConvertError::InvalidHtml { message }
            | ConvertError::Parse { message }
            | ConvertError::EmptyNode { message }
            | ConvertError::EmptyBody { message, .. }
            | ConvertError::NoBody { message, .. }
            | ConvertError::NoContent { message, .. }
            | ConvertError::UnknownNodeType { message, .. } => message,
        }
    }

    /// The node the failure was detected at, when there is one.
    pub fn node(&self) -> Option<&NodeRef> {
        match self {
            ConvertError::EmptyBody { node, .. }
            | ConvertError::NoBody { node, .. }
            | ConvertError::NoContent { node, .. }
            | ConvertError::UnknownNodeType { node, .. } => Some(node),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Parse {
            message: err.to_string(),
        }
    }
}

// ─── Reverse direction ───────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReverseError {
    #[error("Go code cannot be empty")]
    EmptyCode,

    #[error("syntax error: unexpected if, expected expression")]
    IfExpression,

    #[error("syntax error at offset {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("syntax error at offset {position}: string literal not terminated")]
    UnterminatedString { position: usize },

    #[error("unsupported argument to {call}: {found}")]
    UnsupportedArgument { call: String, found: String },

    #[error("could not find main node expression in Go code")]
    MissingExpression,
}

impl ReverseError {
    /// Render the error as an HTML comment that can stand in for the output.
    pub fn to_html_comment(&self) -> String {
        match self {
            ReverseError::IfExpression => format!(
                "<!-- {} -->\n\
                 <!-- Go has no if-expression; wrap the branch in a function: -->\n\
                 <!--\n    var n = htmlgo.Div(htmlgo.Text(func() string {{\n        if condition {{\n            return \"yes\"\n        }}\n        return \"no\"\n    }}()))\n-->",
                self
            ),
            ReverseError::UnexpectedToken { .. } | ReverseError::UnterminatedString { .. } => {
                format!(
                    "<!-- {} -->\n<!-- check brackets, commas and quotes -->",
                    self
                )
            }
            other => format!("<!-- {} -->", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = ConvertError::InvalidHtml {
            message: "unclosed tag detected".to_string(),
        };
        assert_eq!(err.to_string(), "InvalidHTML: unclosed tag detected");
        assert_eq!(err.kind(), ErrorKind::InvalidHtml);
        assert_eq!(err.message(), "unclosed tag detected");
        assert!(err.node().is_none());
    }

    #[test]
    fn node_ref_survives_on_location_errors() {
        let err = ConvertError::EmptyBody {
            message: "body tag has no valid content".to_string(),
            node: NodeRef::new(&[0, 1], "<body>"),
        };
        let node = err.node().expect("body ref");
        assert_eq!(node.path, vec![0, 1]);
        assert_eq!(node.to_string(), "<body> at /0/1");
    }

    #[test]
    fn kind_names_match_wire_spelling() {
        assert_eq!(ErrorKind::InvalidHtml.as_str(), "InvalidHTML");
        assert_eq!(ErrorKind::UnknownNodeType.to_string(), "UnknownNodeType");
    }

    #[test]
    fn if_expression_comment_has_hint() {
        let comment = ReverseError::IfExpression.to_html_comment();
        assert!(comment.starts_with("<!-- syntax error: unexpected if"));
        assert!(comment.contains("func() string"));
    }
}
