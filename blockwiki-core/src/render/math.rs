//! MathJax-compatible math rendering.
//!
//! LaTeX is wrapped in delimiters that MathJax typesets client-side.

use crate::html::escape;

pub fn inline(math: &str) -> String {
    let escaped = escape(math);
    format!(
        r#"<span class="math math-inline" aria-label="{}">\({}\)</span>"#,
        escaped, escaped
    )
}

pub fn display(math: &str) -> String {
    let escaped = escape(math);
    format!(
        r#"<div class="math math-display" aria-label="{}">\[{}\]</div>"#,
        escaped, escaped
    )
}
