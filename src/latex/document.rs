//! Complete LaTeX document: preamble, one page per slide, numbering.

use crate::config::{Config, HruleConfig, OverlayConfig, ThemeColors};
use crate::latex::Transpiler;
use crate::slide::ResolvedSlide;

const BLACK: &str = "0.000,0.000,0.000";

/// Pixel lengths are CSS pixels (1/96 in); LaTeX points are 1/72.27 in.
const PT_PER_PX: f64 = 0.75;

pub struct DocumentAssembler<'a> {
    config: &'a Config,
    transpiler: Transpiler,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        let mut transpiler = Transpiler::from_config(config);
        if config.title_hrule_enabled() {
            transpiler = transpiler.with_heading_rule(title_rule(&config.style.hrule));
        }
        Self { config, transpiler }
    }

    /// Build the document for `slides`. Every slide becomes one page, with
    /// a page break between consecutive slides only.
    pub fn assemble(&self, slides: &[ResolvedSlide]) -> String {
        let total = slides.len();
        let pages: Vec<String> = slides
            .iter()
            .map(|slide| self.render_slide(slide, total))
            .collect();

        let mut out = self.preamble();
        out.push_str("\\begin{document}\n\\color{textcolor}\n\n");
        out.push_str(&pages.join("\n\\newpage\n\n"));
        out.push_str("\n\\end{document}\n");
        out
    }

    pub fn preamble(&self) -> String {
        let colors: &ThemeColors = &self.config.theme.colors;
        let mut out = String::new();

        out.push_str("\\documentclass[11pt]{article}\n\n");
        out.push_str("\\usepackage[landscape,margin=0.5in]{geometry}\n");
        out.push_str("\\usepackage[utf8]{inputenc}\n");
        out.push_str("\\usepackage[T1]{fontenc}\n");
        out.push_str("\\usepackage{textcomp}\n");
        out.push_str("\\usepackage{xcolor}\n");
        out.push_str("\\usepackage{amsmath}\n");
        out.push_str("\\usepackage{amssymb}\n");
        out.push_str("\\usepackage{enumitem}\n");
        out.push_str("\\usepackage{listings}\n");
        out.push_str("\\usepackage{multicol}\n");
        out.push_str("\\usepackage{booktabs}\n");
        out.push_str("\\usepackage{graphicx}\n\n");

        out.push_str(&format!(
            "\\definecolor{{bgcolor}}{{rgb}}{{{}}}\n",
            hex_to_rgb(&colors.background)
        ));
        out.push_str(&format!(
            "\\definecolor{{textcolor}}{{rgb}}{{{}}}\n",
            hex_to_rgb(&colors.text)
        ));
        out.push_str(&format!(
            "\\definecolor{{accentcolor}}{{rgb}}{{{}}}\n\n",
            hex_to_rgb(&colors.accent)
        ));

        out.push_str("\\pagecolor{bgcolor}\n");
        out.push_str("\\pagestyle{empty}\n");
        out.push_str("\\setlength{\\parindent}{0pt}\n");
        if self.config.font.sans {
            out.push_str("\\renewcommand{\\familydefault}{\\sfdefault}\n");
        }
        out.push('\n');

        out.push_str("\\newcommand{\\slidetitle}[1]{%\n");
        out.push_str("  \\begin{center}\n");
        out.push_str("  \\textcolor{accentcolor}{\\huge\\textbf{#1}}\n");
        out.push_str("  \\end{center}\n");
        out.push_str("  \\vspace{0.5cm}\n");
        out.push_str("}\n\n");

        if self.config.math.enabled {
            out.push_str("\\everymath{\\displaystyle}\n\n");
        }

        out.push_str("\\setlist[itemize]{leftmargin=1cm,itemsep=0.3cm}\n");
        out.push_str("\\setlist[enumerate]{leftmargin=1cm,itemsep=0.3cm}\n");
        out.push_str("\\renewcommand{\\labelitemi}{\\textcolor{accentcolor}{\\textbullet}}\n\n");

        out.push_str("\\lstset{\n");
        out.push_str("  backgroundcolor=\\color{gray!10},\n");
        out.push_str("  basicstyle=\\ttfamily\\small,\n");
        out.push_str("  keywordstyle=\\color{accentcolor}\\bfseries,\n");
        out.push_str("  stringstyle=\\color{green!60!black},\n");
        out.push_str("  commentstyle=\\color{gray},\n");
        out.push_str("  showstringspaces=false,\n");
        out.push_str("  breaklines=true,\n");
        out.push_str("  frame=single,\n");
        out.push_str("  rulecolor=\\color{gray!30}\n");
        out.push_str("}\n\n");

        out
    }

    /// One page: title, optional rule, transpiled body, slide number.
    pub fn render_slide(&self, slide: &ResolvedSlide, total: usize) -> String {
        let text = flatten_overlays(&slide.source, &self.config.overlays);
        let (title, body) = extract_title(&text);
        let mut out = String::new();

        if let Some(title) = title {
            out.push_str(&format!(
                "\\slidetitle{{{}}}\n",
                self.transpiler.transpile_inline(&title)
            ));
            if self.config.title_hrule_enabled() {
                out.push_str(&title_rule(&self.config.style.hrule));
            }
            out.push('\n');
        }

        let body = self.transpiler.transpile(&body);
        if !body.is_empty() {
            out.push_str(&body);
            out.push_str("\n\n");
        }

        let numbering = &self.config.slide_number;
        if numbering.enabled {
            let number = numbering.format.render(slide.index, total).replace('%', "\\%");
            out.push_str("\\vfill\n");
            out.push_str("\\begin{flushright}\n");
            out.push_str(&format!("\\textcolor{{gray}}{{\\small {}}}\n", number));
            out.push_str("\\end{flushright}\n");
        }

        out
    }
}

/// Every overlay stage is shown on the printed page, so pause markers
/// become paragraph breaks.
fn flatten_overlays(text: &str, overlays: &OverlayConfig) -> String {
    let mut out = text.to_string();
    for marker in [&overlays.marker, &overlays.alternate_marker] {
        if !marker.is_empty() && out.contains(marker.as_str()) {
            out = out.replace(marker.as_str(), "\n\n");
        }
    }
    out
}

/// Split off the first level-1 heading outside fenced code.
fn extract_title(text: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut in_fence = false;
    let mut title_line = None;

    for (n, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(title) = line.strip_prefix('#') {
            if title.starts_with([' ', '\t']) && !title.trim().is_empty() {
                title_line = Some((n, title.trim().to_string()));
                break;
            }
        }
    }

    match title_line {
        Some((n, title)) => {
            let body: Vec<&str> = lines
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != n)
                .map(|(_, line)| *line)
                .collect();
            (Some(title), body.join("\n").trim().to_string())
        }
        None => (None, text.trim().to_string()),
    }
}

fn title_rule(hrule: &HruleConfig) -> String {
    format!(
        "\\begin{{center}}\n{{\\color{{accentcolor}}\\rule{{{}}}{{{}}}}}\n\\end{{center}}\n",
        latex_width(&hrule.width),
        latex_length(&hrule.thickness, "0.4pt")
    )
}

/// `80%` becomes a fraction of `\linewidth`; other lengths go through
/// [`latex_length`].
fn latex_width(width: &str) -> String {
    let width = width.trim();
    if let Some(percent) = width.strip_suffix('%') {
        return match percent.trim().parse::<f64>() {
            Ok(p) => format!("{:.2}\\linewidth", p / 100.0),
            Err(_) => "\\linewidth".to_string(),
        };
    }
    latex_length(width, "\\linewidth")
}

/// CSS pixels become points; lengths LaTeX understands pass through.
fn latex_length(length: &str, fallback: &str) -> String {
    let length = length.trim();
    if let Some(px) = length.strip_suffix("px") {
        return match px.trim().parse::<f64>() {
            Ok(px) => format!("{:.2}pt", px * PT_PER_PX),
            Err(_) => fallback.to_string(),
        };
    }
    let unit_start = length
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(length.len());
    let (number, unit) = length.split_at(unit_start);
    let known_unit = matches!(unit, "pt" | "mm" | "cm" | "in" | "em" | "ex");
    if known_unit && number.parse::<f64>().is_ok() {
        length.to_string()
    } else {
        log::warn!("Unsupported length {:?}, using {}", length, fallback);
        fallback.to_string()
    }
}

/// `#rrggbb` to `r,g,b` components in 0..1. Anything else is black.
fn hex_to_rgb(hex: &str) -> String {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        log::warn!("Invalid color {:?}, using black", hex);
        return BLACK.to_string();
    }

    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map(|v| f64::from(v) / 255.0)
    };
    match (component(0..2), component(2..4), component(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => format!("{:.3},{:.3},{:.3}", r, g, b),
        _ => BLACK.to_string(),
    }
}
