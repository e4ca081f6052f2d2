mod compile;
mod config;
mod directive;
mod error;
mod html;
pub mod latex;
mod segment;
mod slide;

pub use compile::{CompileReport, CompileStatus, LatexCompiler, SUCCESS_MARKER, classify};
pub use config::{
    Config, ContentConfig, FontConfig, HruleConfig, HruleStyle, LayoutConfig, MathConfig,
    OverlayConfig, PdfConfig, SlideNumberConfig, SlideNumberFormat, StyleConfig, ThemeColors,
    ThemeConfig,
};
pub use directive::{
    DirectiveResolver, LintWarning, detect_columns, inject_title_rules, lint, split_overlays,
};
pub use error::{Error, Result};
pub use html::{CommonMarkRenderer, FragmentRenderer, MarkupRenderer, columns_to_html};
pub use latex::{DocumentAssembler, PASSES, Pass, Transpiler};
pub use segment::split_slides;
pub use slide::{CodeBlock, ColumnSet, ColumnSyntax, ResolvedSlide, Slide, TableBlock};

use std::fs;

/// Both renderings of one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// One fragment per slide, in slide order.
    pub html: Vec<String>,
    /// A complete LaTeX document.
    pub latex: String,
}

/// Split a document into slides and resolve their directives.
pub fn resolve_slides(markdown: &str, config: &Config) -> Result<Vec<ResolvedSlide>> {
    let slides = split_slides(markdown, &config.content.slide_separator)?;
    Ok(DirectiveResolver::new(config).resolve_all(&slides))
}

/// Render a deck to HTML fragments and a LaTeX document from one resolution.
pub fn convert(markdown: &str, config: &Config) -> Result<Conversion> {
    let slides = resolve_slides(markdown, config)?;
    let renderer = CommonMarkRenderer::default();
    Ok(Conversion {
        html: FragmentRenderer::new(&renderer).render(&slides),
        latex: DocumentAssembler::new(config).assemble(&slides),
    })
}

/// Convert markdown to HTML fragments with the bundled configuration.
pub fn markdown_to_html(markdown: &str) -> Result<Vec<String>> {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> Result<Vec<String>> {
    let slides = resolve_slides(markdown, config)?;
    let renderer = CommonMarkRenderer::default();
    Ok(FragmentRenderer::new(&renderer).render(&slides))
}

/// Convert markdown to a LaTeX document with the bundled configuration.
pub fn markdown_to_latex(markdown: &str) -> Result<String> {
    markdown_to_latex_with_config(markdown, &Config::compiled_default())
}

pub fn markdown_to_latex_with_config(markdown: &str, config: &Config) -> Result<String> {
    let slides = resolve_slides(markdown, config)?;
    Ok(DocumentAssembler::new(config).assemble(&slides))
}

/// Convert markdown to PDF bytes with the configured LaTeX engine.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    let latex = markdown_to_latex_with_config(markdown, config)?;

    let compiler = LatexCompiler::from_config(&config.pdf);
    if !compiler.is_available() {
        return Err(Error::CompilerUnavailable(compiler.engine().to_string()));
    }

    let work_dir = tempfile::tempdir()?;
    let report = compiler.compile(&latex, work_dir.path(), "presentation")?;
    Ok(fs::read(&report.pdf_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_keeps_both_outputs_in_step() {
        let conversion = convert("# A\n\nfoo\n\n---\n\n# B\n\nbar", &Config::default()).unwrap();
        assert_eq!(conversion.html.len(), 2);
        assert!(conversion.html[0].contains("<h1>A</h1>"));
        assert!(conversion.html[1].contains("<p>bar</p>"));
        assert!(conversion.latex.contains("\\slidetitle{A}"));
        assert!(conversion.latex.contains("\\slidetitle{B}"));
        assert_eq!(conversion.latex.matches("\\newpage").count(), 1);
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(markdown_to_html(" \n---\n\n"), Err(Error::NoSlides)));
        assert!(matches!(markdown_to_latex(""), Err(Error::NoSlides)));
    }

    #[test]
    fn custom_separator() {
        let mut config = Config::default();
        config.content.slide_separator = "***".to_string();
        let html = markdown_to_html_with_config("one\n***\ntwo\n---\nstill two", &config).unwrap();
        assert_eq!(html.len(), 2);
    }
}
