/// Turn an HTML tag name into the builder function name.
///
/// Hyphenated custom-element names become PascalCase (`my-component` ->
/// `MyComponent`); everything else only gets its first letter uppercased.
pub fn component_name(tag: &str) -> String {
    if tag.contains('-') {
        tag.split('-').map(capitalize).collect()
    } else {
        capitalize(tag)
    }
}

/// Inverse of [`component_name`]: `MyComponent` -> `my-component`, `H1` -> `h1`.
pub fn tag_name(function: &str) -> String {
    let mut out = String::with_capacity(function.len() + 4);
    for (i, c) in function.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
