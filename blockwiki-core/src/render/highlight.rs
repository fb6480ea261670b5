//! Code syntax highlighting using syntect.

use crate::html::escape;
use std::collections::HashSet;
use std::sync::OnceLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::warn;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Language the source uses for unhighlighted code
const PLAIN_TEXT: &str = "plain text";

/// Class-based highlighter restricted to an allow-list of languages
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    allowed: HashSet<String>,
}

impl Highlighter {
    /// An empty list allows every language syntect knows.
    pub fn new(languages: &[String]) -> Self {
        Self {
            allowed: languages.iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    fn syntax(&self, language: &str) -> Option<&'static SyntaxReference> {
        if !self.allowed.is_empty() && !self.allowed.contains(language) {
            return None;
        }
        let ss = syntax_set();
        ss.find_syntax_by_token(language)
            .or_else(|| ss.find_syntax_by_extension(language))
    }

    /// Highlighted markup for `code`, or escaped text for unknown languages.
    pub fn highlight(&self, code: &str, language: &str) -> String {
        let language = language.to_lowercase();
        if language == PLAIN_TEXT {
            return escape(code);
        }
        let Some(syntax) = self.syntax(&language) else {
            warn!("Unrecognized language -- {}", language);
            return escape(code);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                warn!("Highlighting {} failed: {}", language, e);
                return escape(code);
            }
        }
        generator.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_gets_classes() {
        let html = Highlighter::default().highlight("fn main() {}\n", "Rust");
        assert!(html.contains("<span class="));
        assert!(html.contains("main"));
    }

    #[test]
    fn plain_text_is_escaped() {
        let html = Highlighter::default().highlight("a < b", "Plain Text");
        assert_eq!(html, "a &lt; b");
    }

    #[test]
    fn unknown_language_is_escaped() {
        let html = Highlighter::default().highlight("<x>", "klingon");
        assert_eq!(html, "&lt;x&gt;");
    }

    #[test]
    fn allow_list_restricts_languages() {
        let highlighter = Highlighter::new(&["python".to_string()]);
        assert_eq!(highlighter.highlight("fn x() {}", "rust"), "fn x() {}");
        assert!(highlighter
            .highlight("def x(): pass\n", "python")
            .contains("<span class="));
    }
}
