use html_escape::{encode_double_quoted_attribute, encode_text};

use super::parser::{Call, Expr, Method};
use crate::error::ReverseError;
use crate::naming::tag_name;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub fn render(expr: &Expr) -> Result<String, ReverseError> {
    match expr {
        Expr::Call(call) => render_call(call),
        Expr::Str(s) => Ok(encode_text(s).into_owned()),
        other => Err(unsupported("expression", other)),
    }
}

fn render_call(call: &Call) -> Result<String, ReverseError> {
    match call.name.as_str() {
        "Text" => Ok(string_args(call)?
            .iter()
            .map(|s| encode_text(s).into_owned())
            .collect()),
        "RawHTML" => Ok(string_args(call)?.concat()),
        _ => render_element(call),
    }
}

fn render_element(call: &Call) -> Result<String, ReverseError> {
    let tag = tag_name(&call.name);
    let mut attrs = Attributes::default();
    let mut children = Vec::new();

    for (i, arg) in call.args.iter().enumerate() {
        match arg {
            Expr::Str(name) if tag == "input" && i == 0 => {
                if !name.is_empty() {
                    attrs.set("name", name);
                }
            }
            Expr::Str(text) => children.push(encode_text(text).into_owned()),
            Expr::Call(child) => children.push(render_call(child)?),
            other => return Err(unsupported(&call.name, other)),
        }
    }

    for method in &call.chain {
        apply(method, &mut attrs, &mut children)?;
    }

    let mut html = format!("<{}", tag);
    for (key, value) in &attrs.0 {
        if value.is_empty() {
            html.push_str(&format!(" {}", key));
        } else {
            html.push_str(&format!(
                " {}=\"{}\"",
                key,
                encode_double_quoted_attribute(value)
            ));
        }
    }
    html.push('>');
    if VOID_ELEMENTS.contains(&tag.as_str()) {
        return Ok(html);
    }
    html.push_str(&children.concat());
    html.push_str(&format!("</{}>", tag));
    Ok(html)
}

fn apply(
    method: &Method,
    attrs: &mut Attributes,
    children: &mut Vec<String>,
) -> Result<(), ReverseError> {
    match method.name.as_str() {
        "Attr" => {
            if method.args.len() % 2 != 0 {
                return Err(ReverseError::UnsupportedArgument {
                    call: "Attr".to_string(),
                    found: format!("{} arguments", method.args.len()),
                });
            }
            for pair in method.args.chunks(2) {
                let Expr::Str(key) = &pair[0] else {
                    return Err(unsupported("Attr", &pair[0]));
                };
                attrs.set_scalar(key, &pair[1], "Attr")?;
            }
        }
        "Class" => {
            for arg in &method.args {
                attrs.append_class(&scalar("Class", arg)?);
            }
        }
        "Id" | "ID" => {
            if let Some(arg) = method.args.first() {
                attrs.set("id", &scalar(&method.name, arg)?);
            }
        }
        "Text" => {
            for arg in &method.args {
                children.push(encode_text(&scalar("Text", arg)?).into_owned());
            }
        }
        "Children" => {
            for arg in &method.args {
                children.push(render(arg)?);
            }
        }
        other => {
            let key = tag_name(other);
            match method.args.first() {
                Some(arg) => attrs.set_scalar(&key, arg, other)?,
                None => attrs.set(&key, ""),
            }
        }
    }
    Ok(())
}

/// Attribute list keyed by first assignment, later writes overwrite in place.
/// An empty value renders as a bare attribute name.
#[derive(Default)]
struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// `true` sets a bare attribute, `false` leaves it out.
    fn set_scalar(&mut self, key: &str, value: &Expr, call: &str) -> Result<(), ReverseError> {
        match value {
            Expr::Ident(b) if b == "true" => self.set(key, ""),
            Expr::Ident(b) if b == "false" => self.remove(key),
            other => self.set(key, &scalar(call, other)?),
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.0.iter().position(|(k, _)| k == key) {
            Some(i) => self.0[i].1 = value.to_string(),
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    fn append_class(&mut self, class: &str) {
        match self.0.iter().position(|(k, _)| k == "class") {
            Some(i) if !self.0[i].1.is_empty() => {
                self.0[i].1.push(' ');
                self.0[i].1.push_str(class);
            }
            _ => self.set("class", class),
        }
    }
}

fn string_args(call: &Call) -> Result<Vec<&str>, ReverseError> {
    call.args
        .iter()
        .map(|arg| match arg {
            Expr::Str(s) => Ok(s.as_str()),
            other => Err(unsupported(&call.name, other)),
        })
        .collect()
}

fn scalar(call: &str, arg: &Expr) -> Result<String, ReverseError> {
    match arg {
        Expr::Str(s) | Expr::Number(s) | Expr::Ident(s) => Ok(s.clone()),
        other => Err(unsupported(call, other)),
    }
}

fn unsupported(call: &str, found: &Expr) -> ReverseError {
    ReverseError::UnsupportedArgument {
        call: call.to_string(),
        found: found.describe(),
    }
}
