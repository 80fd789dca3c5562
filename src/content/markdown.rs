//! Markdown rendering

use pulldown_cmark::{html, Options, Parser};

/// CommonMark renderer with the GitHub extensions posts rely on.
///
/// Raw HTML in the markdown is emitted as-is; content files are trusted.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // YAML metadata blocks stay off; front-matter is stripped before rendering
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_table() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("<div class=\"callout\">Heads up</div>\n\nText");
        assert!(html.contains("<div class=\"callout\">Heads up</div>"));
    }

    #[test]
    fn test_strikethrough_and_tasklist() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("~~old~~\n\n- [x] done\n");
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_smart_punctuation_off() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("\"quoted\"");
        assert!(html.contains("quoted"));
        assert!(!html.contains('\u{201c}'));
    }
}
