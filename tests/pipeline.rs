use bodh::{
    Config, Error, convert, markdown_to_html, markdown_to_html_with_config, markdown_to_latex,
    markdown_to_latex_with_config, resolve_slides, split_slides,
};

#[test]
fn two_slides_split_on_separator() {
    let slides = split_slides("# A\n\nfoo\n\n---\n\n# B\n\nbar", "---").unwrap();
    assert_eq!(slides.len(), 2);
    assert!(slides[0].text.contains("# A") && slides[0].text.contains("foo"));
    assert!(slides[1].text.contains("# B") && slides[1].text.contains("bar"));
}

#[test]
fn two_attributed_columns() {
    let md = "# Compare\n\n::: {.column}\n**Left**\n:::\n\n::: {.column}\n- x\n- y\n:::";

    let html = markdown_to_html(md).unwrap();
    assert_eq!(html.len(), 1);
    assert!(html[0].starts_with("<h1>Compare</h1>"));
    assert!(html[0].contains("class=\"columns-layout columns-2\""));
    assert_eq!(html[0].matches("<div class=\"column\">").count(), 2);
    assert!(html[0].contains("<strong>Left</strong>"));
    assert!(html[0].contains("<li>x</li>"));
    assert!(!html[0].contains(":::"));

    let latex = markdown_to_latex(md).unwrap();
    assert!(latex.contains("\\slidetitle{Compare}"));
    assert!(latex.contains("\\begin{multicols}{2}\n\\textbf{Left}\n\\columnbreak\n\\begin{itemize}"));
    assert_eq!(latex.matches("\\columnbreak").count(), 1);
}

#[test]
fn column_count_follows_content_not_settings() {
    let mut config = Config::default();
    config.layout.columns = 2;
    let md = (1..=4)
        .map(|n| format!("::: {{.column}}\nC{n}\n:::"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let html = markdown_to_html_with_config(&md, &config).unwrap();
    assert!(html[0].contains("columns-4"));
    assert!(html[0].contains("repeat(4, 1fr)"));

    let latex = markdown_to_latex_with_config(&md, &config).unwrap();
    assert!(latex.contains("\\begin{multicols}{4}"));
    assert_eq!(latex.matches("\\columnbreak").count(), 3);
}

#[test]
fn bare_column_syntax() {
    let html = markdown_to_html("# T\n:::\nleft\n:::\n:::\nright\n:::").unwrap();
    assert!(html[0].contains("columns-2"));

    let single = markdown_to_html("# T\n:::\nonly\n:::").unwrap();
    assert!(!single[0].contains("columns-layout"));
}

#[test]
fn table_drops_malformed_rows() {
    let md = "# Data\n\n| A | B |\n|---|---|\n| 1 | 2 |\n| 1 | 2 | 3 |";
    let latex = markdown_to_latex(md).unwrap();
    assert!(latex.contains(
        "\\begin{tabular}{ll}\n\\toprule\nA & B \\\\\n\\midrule\n1 & 2 \\\\\n\\bottomrule\n\\end{tabular}"
    ));
    assert!(!latex.contains("1 & 2 & 3"));
    assert!(!latex.contains("\\item"));
}

#[test]
fn overlays_wrap_later_segments() {
    let mut config = Config::default();
    config.overlays.enabled = true;
    let md = "A<!--pause-->B<!--pause-->C";

    let slides = resolve_slides(md, &config).unwrap();
    assert_eq!(slides[0].overlay_count, 2);

    let html = markdown_to_html_with_config(md, &config).unwrap();
    assert!(html[0].starts_with("<p>A</p>"));
    assert!(html[0].contains("data-overlay=\"1\""));
    assert!(html[0].contains("data-overlay=\"2\""));
    assert!(html[0].find("<p>B</p>") < html[0].find("data-overlay=\"2\""));
    assert!(html[0].contains("<p>C</p>"));

    let latex = markdown_to_latex_with_config(md, &config).unwrap();
    assert!(latex.contains("A\n\\par\\medskip\nB\n\\par\\medskip\nC"));
    assert!(!latex.contains("pause-->"));
}

#[test]
fn overlay_around_columns_keeps_divs_balanced() {
    let mut config = Config::default();
    config.overlays.enabled = true;
    let md = "# T\n\nintro\n<!--pause-->\n::: {.column}\nA\n:::\n::: {.column}\nB\n:::";

    let html = markdown_to_html_with_config(md, &config).unwrap();
    assert_eq!(html[0].matches("<div").count(), 4);
    assert_eq!(html[0].matches("</div>").count(), 4);
    assert!(html[0].find("data-overlay=\"1\"") < html[0].find("columns-layout"));
}

#[test]
fn overlays_disabled_by_default() {
    let slides = resolve_slides("A<!--pause-->B", &Config::default()).unwrap();
    assert_eq!(slides[0].overlay_count, 0);
}

#[test]
fn latex_document_structure() {
    let md = "# Intro ✅\n\nWelcome\n\n---\n\n## No title here\n\n---\n\n# Code\n\n```python\nprint('50%')\n```";
    let latex = markdown_to_latex(md).unwrap();

    assert!(latex.starts_with("\\documentclass[11pt]{article}"));
    assert!(latex.trim_end().ends_with("\\end{document}"));
    assert_eq!(latex.matches("\\newpage").count(), 2);
    assert!(latex.contains("\\slidetitle{Intro \\ensuremath{\\checkmark}}"));
    assert!(latex.contains("\\textbf{\\huge No title here}\\\\[0.5cm]"));
    assert!(latex.contains("\\begin{lstlisting}[language=Python]\nprint('50%')\n\\end{lstlisting}"));
    assert!(latex.contains("\\small 1/3}"));
    assert!(latex.contains("\\small 3/3}"));
    assert!(latex.is_ascii());
}

#[test]
fn unterminated_fence_stays_literal() {
    let latex = markdown_to_latex("```\ncode 50%").unwrap();
    assert!(!latex.contains("\\begin{lstlisting}"));
    assert!(latex.contains("```\ncode 50\\%"));
}

#[test]
fn title_rules_in_both_outputs() {
    let mut config = Config::default();
    config.style.hrule.enabled = true;
    let conversion = convert("# Title\n\nBody", &config).unwrap();
    assert!(conversion.html[0].contains("<hr class=\"title-hrule\""));
    assert!(conversion.latex.contains("\\rule{0.80\\linewidth}{1.50pt}"));
}

#[test]
fn no_slides_is_an_error() {
    assert!(matches!(markdown_to_latex("\n\n---\n   \n"), Err(Error::NoSlides)));
}
