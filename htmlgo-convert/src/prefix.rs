/// Package qualifier written in front of every generated call by default.
pub const DEFAULT_PACKAGE_PREFIX: &str = "htmlgo";

/// Swap the package qualifier of already generated code.
///
/// Only qualifiers at call positions are touched: `from` must start at an
/// identifier boundary and be followed by `.` and an uppercase identifier.
/// String literals are copied untouched. An empty `to` strips the qualifier.
pub fn replace_package_prefix(code: &str, from: &str, to: &str) -> String {
    if from.is_empty() || from == to {
        return code.to_string();
    }
    let needle = format!("{from}.");
    let mut out = String::with_capacity(code.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < code.len() {
        let rest = &code[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if rest.starts_with(&needle)
            && !prev.is_some_and(is_ident_char)
            && rest[needle.len()..]
                .chars()
                .next()
                .is_some_and(|n| n.is_ascii_uppercase())
        {
            if !to.is_empty() {
                out.push_str(to);
                out.push('.');
            }
            i += needle.len();
            prev = Some('.');
            continue;
        }

        out.push(c);
        prev = Some(c);
        i += c.len_utf8();
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_call_qualifiers() {
        let code = r#"htmlgo.Div(htmlgo.Text("x")).Class("c")"#;
        assert_eq!(
            replace_package_prefix(code, "htmlgo", "h"),
            r#"h.Div(h.Text("x")).Class("c")"#
        );
    }

    #[test]
    fn empty_target_strips_qualifier() {
        let code = r#"htmlgo.Div(htmlgo.Text("x"))"#;
        assert_eq!(
            replace_package_prefix(code, "htmlgo", ""),
            r#"Div(Text("x"))"#
        );
    }

    #[test]
    fn string_literals_are_untouched() {
        let code = r#"htmlgo.P(htmlgo.Text("use htmlgo.Div \" htmlgo.Span"))"#;
        assert_eq!(
            replace_package_prefix(code, "htmlgo", "h"),
            r#"h.P(h.Text("use htmlgo.Div \" htmlgo.Span"))"#
        );
    }

    #[test]
    fn longer_identifiers_are_not_prefixes() {
        let code = "myhtmlgo.Div(htmlgo.div)";
        assert_eq!(replace_package_prefix(code, "htmlgo", "h"), code);
    }
}
