//! HTML escaping helpers.

/// Escape only the angle brackets. Used for text runs, where entities the
/// author typed are meant to pass through.
pub fn escape_angles(input: &str) -> String {
    input.replace('<', "&lt;").replace('>', "&gt;")
}

/// Full escape for attribute values and raw code.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
