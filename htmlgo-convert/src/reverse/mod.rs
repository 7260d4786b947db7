//! Builder code back to HTML.
//!
//! This is a static reading of the code, nothing is executed. The snippet may
//! carry a `package` clause, imports and a single `var x =` or `x :=`
//! statement around the node expression.

mod parser;
mod render;

use tracing::debug;

use crate::error::ReverseError;

pub use parser::{parse_program, Call, Expr, Method};

/// Render a builder expression as indented-by-line HTML.
pub fn builder_to_html(code: &str) -> Result<String, ReverseError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ReverseError::EmptyCode);
    }
    let expr = parse_program(code)?;
    let html = render::render(&expr)?;
    debug!(bytes = html.len(), "builder code rendered");
    Ok(html.replace("><", ">\n<"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_elements_with_class() {
        let html = builder_to_html(
            r#"htmlgo.Div(htmlgo.H1(htmlgo.Text("Hello")), htmlgo.P(htmlgo.Text("a < b"))).Class("container")"#,
        )
        .unwrap();
        assert_eq!(
            html,
            "<div class=\"container\">\n<h1>Hello</h1>\n<p>a &lt; b</p>\n</div>"
        );
    }

    #[test]
    fn input_name_and_void_rendering() {
        let html = builder_to_html(
            r#"htmlgo.Input("email").Type("email").Attr("placeholder", "Email", "required", true)"#,
        )
        .unwrap();
        assert_eq!(
            html,
            "<input name=\"email\" type=\"email\" placeholder=\"Email\" required>"
        );
    }

    #[test]
    fn multi_line_setter_chain() {
        let code = "var n = h.Input(\"\").\n\tType(\"text\").\n\tClass(\"input\").\n\tPlaceholder(\"Enter text\").\n\tRequired(true).\n\tDisabled(false)";
        assert_eq!(
            builder_to_html(code).unwrap(),
            "<input type=\"text\" class=\"input\" placeholder=\"Enter text\" required>"
        );
    }

    #[test]
    fn string_arguments_are_text_children() {
        let html = builder_to_html(
            "var n = h.Div(\n\th.H1(\"Hello\").Class(\"title\"),\n\th.P(\"World\").Class(\"text\"),\n).Class(\"container\")",
        )
        .unwrap();
        assert_eq!(
            html,
            "<div class=\"container\">\n<h1 class=\"title\">Hello</h1>\n<p class=\"text\">World</p>\n</div>"
        );
    }

    #[test]
    fn empty_input_name_is_dropped() {
        assert_eq!(builder_to_html(r#"Input("")"#).unwrap(), "<input>");
    }

    #[test]
    fn kebab_tags_and_vue_attrs() {
        let html = builder_to_html(
            r#"h.TodoItem().Attr("v-for", "t in todos", ":key", "t.id", "@click", "pick(t)")"#,
        )
        .unwrap();
        assert_eq!(
            html,
            "<todo-item v-for=\"t in todos\" :key=\"t.id\" @click=\"pick(t)\">\n</todo-item>"
        );
    }

    #[test]
    fn classes_accumulate_and_id_aliases() {
        let html = builder_to_html(r#"Span().Class("a").Class("b").ID("x")"#).unwrap();
        assert_eq!(html, "<span class=\"a b\" id=\"x\">\n</span>");
    }

    #[test]
    fn children_method_and_raw_html() {
        let html =
            builder_to_html(r#"Ul().Children(Li(Text("1")), RawHTML("<li>2</li>"))"#).unwrap();
        assert_eq!(html, "<ul>\n<li>1</li>\n<li>2</li>\n</ul>");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let html = builder_to_html(r#"A(Text("go")).Href("/q?a=1&b=\"2\"")"#).unwrap();
        assert_eq!(html, "<a href=\"/q?a=1&amp;b=&quot;2&quot;\">go</a>");
    }

    #[test]
    fn empty_code_is_rejected() {
        assert_eq!(builder_to_html("  \n"), Err(ReverseError::EmptyCode));
    }

    #[test]
    fn odd_attr_arguments_are_unsupported() {
        let err = builder_to_html(r#"Div().Attr("a")"#).unwrap_err();
        assert!(matches!(err, ReverseError::UnsupportedArgument { .. }));
    }

    #[test]
    fn identifiers_cannot_be_children() {
        let err = builder_to_html("Div(content)").unwrap_err();
        assert_eq!(
            err,
            ReverseError::UnsupportedArgument {
                call: "Div".to_string(),
                found: "identifier content".to_string(),
            }
        );
    }
}
