use pulldown_cmark::{Options, Parser, html};

use crate::slide::{ColumnSet, ResolvedSlide};

/// Converts base markup to an HTML fragment.
pub trait MarkupRenderer {
    fn render(&self, markup: &str) -> String;
}

/// CommonMark renderer with the extension set slides are written against:
/// fenced code, tables, highlight classes on code blocks, and the "extra"
/// inline rules (footnotes, strikethrough, task lists, heading attributes).
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkRenderer {
    options: Options,
    highlight: bool,
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        Self::new(options)
    }
}

impl CommonMarkRenderer {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            highlight: true,
        }
    }

    /// Disable the `codehilite` wrapper around code blocks.
    pub fn without_highlight(mut self) -> Self {
        self.highlight = false;
        self
    }
}

impl MarkupRenderer for CommonMarkRenderer {
    fn render(&self, markup: &str) -> String {
        let parser = Parser::new_ext(markup, self.options);
        let mut out = String::new();
        html::push_html(&mut out, parser);

        // Fenced code already carries `language-*`; the wrapper is what the
        // slide stylesheet keys on.
        if self.highlight {
            out = out
                .replace("<pre><code", "<div class=\"codehilite\"><pre><code")
                .replace("</code></pre>", "</code></pre></div>");
        }
        out
    }
}

/// Render a column set as a grid container with one cell per column.
pub fn columns_to_html(set: &ColumnSet, renderer: &dyn MarkupRenderer) -> String {
    let count = set.len();
    let cells: Vec<String> = set
        .columns
        .iter()
        .map(|column| format!("<div class=\"column\">{}</div>", renderer.render(column)))
        .collect();

    format!(
        "<div class=\"columns-layout columns-{count}\" style=\"display: grid; grid-template-columns: repeat({count}, 1fr);\">{}</div>",
        cells.join(" ")
    )
}

/// Produces one HTML fragment per resolved slide, in slide order.
pub struct FragmentRenderer<'a> {
    renderer: &'a dyn MarkupRenderer,
}

impl<'a> FragmentRenderer<'a> {
    pub fn new(renderer: &'a dyn MarkupRenderer) -> Self {
        Self { renderer }
    }

    pub fn render_slide(&self, slide: &ResolvedSlide) -> String {
        let mut out = if slide.markup.trim().is_empty() {
            String::new()
        } else {
            self.renderer.render(slide.markup.trim())
        };
        if let Some(set) = &slide.columns {
            out.push_str(&columns_to_html(set, self.renderer));
        }
        out.push_str(&"</div>".repeat(slide.open_overlays));
        out
    }

    pub fn render(&self, slides: &[ResolvedSlide]) -> Vec<String> {
        slides.iter().map(|slide| self.render_slide(slide)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::ColumnSyntax;

    fn render(markup: &str) -> String {
        CommonMarkRenderer::default().render(markup)
    }

    #[test]
    fn paragraph_and_emphasis() {
        assert_eq!(
            render("**bold** and *italic*"),
            "<p><strong>bold</strong> and <em>italic</em></p>\n"
        );
    }

    #[test]
    fn tables_are_enabled() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn custom_options_drop_extensions() {
        let html = CommonMarkRenderer::new(Options::empty()).render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(!html.contains("<table>"));
        assert!(render("~~gone~~").contains("<del>gone</del>"));
        assert!(!CommonMarkRenderer::new(Options::empty()).render("~~gone~~").contains("<del>"));
    }

    #[test]
    fn fenced_code_is_wrapped_for_highlighting() {
        let html = render("```python\nx = 1\n```");
        assert!(html.starts_with("<div class=\"codehilite\"><pre><code class=\"language-python\">"));
        assert!(html.trim_end().ends_with("</code></pre></div>"));

        let plain = CommonMarkRenderer::default().without_highlight().render("```\nx\n```");
        assert!(!plain.contains("codehilite"));
    }

    #[test]
    fn columns_render_each_cell_as_markup() {
        let set = ColumnSet {
            syntax: ColumnSyntax::Attributed,
            lead: String::new(),
            columns: vec!["- one\n- two".to_string(), "**right**".to_string()],
        };
        let html = columns_to_html(&set, &CommonMarkRenderer::default());
        assert!(html.starts_with("<div class=\"columns-layout columns-2\""));
        assert!(html.contains("repeat(2, 1fr)"));
        assert_eq!(html.matches("<div class=\"column\">").count(), 2);
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<strong>right</strong>"));
    }

    #[test]
    fn open_overlay_closes_after_the_grid() {
        let slide = ResolvedSlide {
            index: 1,
            source: String::new(),
            markup: "intro\n\n<div class=\"overlay\" data-overlay=\"1\">".to_string(),
            columns: Some(ColumnSet {
                syntax: ColumnSyntax::Attributed,
                lead: String::new(),
                columns: vec!["A".to_string(), "B".to_string()],
            }),
            overlay_count: 1,
            open_overlays: 1,
        };
        let html = FragmentRenderer::new(&CommonMarkRenderer::default()).render_slide(&slide);
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
        assert!(html.find("data-overlay=\"1\"") < html.find("columns-layout"));
        assert!(html.ends_with("</div></div>"));
    }

    #[test]
    fn fragments_follow_slide_order() {
        let slides: Vec<ResolvedSlide> = ["# One", "# Two"]
            .iter()
            .enumerate()
            .map(|(i, text)| ResolvedSlide {
                index: i + 1,
                source: text.to_string(),
                markup: text.to_string(),
                columns: None,
                overlay_count: 0,
                open_overlays: 0,
            })
            .collect();
        let renderer = CommonMarkRenderer::default();
        let fragments = FragmentRenderer::new(&renderer).render(&slides);
        assert_eq!(fragments, vec!["<h1>One</h1>\n", "<h1>Two</h1>\n"]);
    }
}
