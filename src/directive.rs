//! Layout directives that the base markup has no syntax for: staged
//! overlays, column blocks, and rules under slide titles.
//!
//! Each rewrite is a no-op when its trigger is absent. They run in a fixed
//! order: overlays, then columns, then title rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Config, HruleConfig};
use crate::slide::{ColumnSet, ColumnSyntax, ResolvedSlide, Slide};

/// `::: {.column}` … `:::`, optionally with attributes after the class.
static ATTRIBUTED_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s):::[ \t]*\{\.column(?:\s[^}]*)?\}(.*?):::").expect("valid column regex")
});

/// Pandoc's outer `:::: {.columns}` / `::::` wrapper lines.
static COLUMNS_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^:{4,}[^\n]*\n?").expect("valid wrapper regex"));

const OVERLAY_OPEN: &str = "<div class=\"overlay\"";

const LONG_LINE: usize = 120;
const DENSE_SLIDE: usize = 25;
const LONG_CODE_BLOCK: usize = 15;

pub struct DirectiveResolver<'a> {
    config: &'a Config,
}

impl<'a> DirectiveResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn resolve(&self, slide: &Slide) -> ResolvedSlide {
        for warning in lint(slide) {
            log::warn!("Slide {}, {}", slide.index, warning);
        }

        let mut text = slide.text.clone();
        let mut overlay_count = 0;

        let overlays = &self.config.overlays;
        if overlays.enabled {
            let (wrapped, count) = split_overlays(&text, &overlays.marker, &overlays.alternate_marker);
            text = wrapped;
            overlay_count = count;
        }

        let mut columns = detect_columns(&text);
        let mut open_overlays = 0;
        if let Some(set) = columns.as_mut().filter(|_| overlay_count > 0) {
            open_overlays = unclosed_overlays(&set.lead);
            for column in &mut set.columns {
                let open = unclosed_overlays(column);
                column.push_str(&"\n\n</div>".repeat(open));
            }
        }

        let mut markup = match &columns {
            Some(set) => {
                log::debug!(
                    "Slide {}: {} columns ({:?} syntax)",
                    slide.index,
                    set.len(),
                    set.syntax
                );
                set.lead.clone()
            }
            None => text,
        };

        if self.config.title_hrule_enabled() {
            markup = inject_title_rules(&markup, &self.config.style.hrule);
        }

        ResolvedSlide {
            index: slide.index,
            source: slide.text.clone(),
            markup,
            columns,
            overlay_count,
            open_overlays,
        }
    }

    pub fn resolve_all(&self, slides: &[Slide]) -> Vec<ResolvedSlide> {
        slides.iter().map(|slide| self.resolve(slide)).collect()
    }
}

/// Wrap every segment after the first pause marker in a numbered overlay
/// container. Falls back to `alternate` when `marker` does not occur.
///
/// Returns the rewritten text and the number of overlays created.
pub fn split_overlays(text: &str, marker: &str, alternate: &str) -> (String, usize) {
    let mut parts: Vec<&str> = split_on_marker(text, marker);
    if parts.len() <= 1 {
        parts = split_on_marker(text, alternate);
    }
    if parts.len() <= 1 {
        return (text.to_string(), 0);
    }

    let mut out = parts[0].to_string();
    for (i, part) in parts.iter().enumerate().skip(1) {
        out.push_str(&format!(
            "\n\n<div class=\"overlay\" data-overlay=\"{i}\">\n\n{}\n\n</div>",
            part.trim()
        ));
    }
    (out, parts.len() - 1)
}

/// Overlay containers opened in `text` but not closed in it.
fn unclosed_overlays(text: &str) -> usize {
    text.matches(OVERLAY_OPEN)
        .count()
        .saturating_sub(text.matches("</div>").count())
}

fn split_on_marker<'t>(text: &'t str, marker: &str) -> Vec<&'t str> {
    if marker.is_empty() {
        return vec![text];
    }
    text.split(marker).collect()
}

/// Find a column layout on the slide.
///
/// The attributed syntax is tried first; the bare `:::` syntax is only
/// considered when there is no attributed block at all. Results of the two
/// are never combined.
pub fn detect_columns(text: &str) -> Option<ColumnSet> {
    if !text.contains(":::") {
        return None;
    }
    let unwrapped = COLUMNS_WRAPPER.replace_all(text, "");
    let text: &str = &unwrapped;

    let matches: Vec<_> = ATTRIBUTED_COLUMN.captures_iter(&text).collect();
    if let Some(first) = matches.first() {
        let start = first.get(0).map_or(0, |m| m.start());
        let columns: Vec<String> = matches
            .iter()
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return None;
        }
        return Some(ColumnSet {
            syntax: ColumnSyntax::Attributed,
            lead: text[..start].trim().to_string(),
            columns,
        });
    }

    let parts: Vec<&str> = text.split(":::").collect();
    let columns: Vec<String> = parts
        .iter()
        .skip(1)
        .step_by(2)
        .map(|part| part.trim())
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect();
    if columns.len() < 2 {
        return None;
    }
    Some(ColumnSet {
        syntax: ColumnSyntax::Bare,
        lead: parts[0].trim().to_string(),
        columns,
    })
}

/// Insert a styled rule after every level-1 and level-2 heading line.
/// Lines inside fenced code are left alone.
pub fn inject_title_rules(text: &str, hrule: &HruleConfig) -> String {
    let rule = format!(
        "<hr class=\"title-hrule\" style=\"width: {}; border-style: {}; border-width: {};\">",
        hrule.width,
        hrule.style.as_css(),
        hrule.thickness
    );

    let mut out = Vec::new();
    let mut in_fence = false;
    for line in text.split('\n') {
        out.push(line);
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && (line.starts_with("# ") || line.starts_with("## ")) {
            out.push(&rule);
        }
    }
    out.join("\n")
}

/// Content that is likely to overflow a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintWarning {
    /// A line longer than 120 visible characters; `line` is 1-based.
    LongLine { line: usize, chars: usize },
    /// More than 25 non-blank lines.
    DenseSlide { lines: usize },
    /// A fenced code block with more than 15 lines.
    LongCodeBlock { lines: usize },
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintWarning::LongLine { line, chars } => {
                write!(f, "line {}: very long line ({} chars) may be cut off", line, chars)
            }
            LintWarning::DenseSlide { lines } => {
                write!(f, "{} lines of content may not fit on one slide", lines)
            }
            LintWarning::LongCodeBlock { lines } => write!(f, "long code block ({} lines)", lines),
        }
    }
}

/// Check a slide for content that is likely to overflow it.
pub fn lint(slide: &Slide) -> Vec<LintWarning> {
    let lines: Vec<&str> = slide.text.lines().collect();
    let mut warnings = Vec::new();

    for (n, line) in lines.iter().enumerate() {
        let chars = line.replace(['*', '_', '`'], "").chars().count();
        if chars > LONG_LINE {
            warnings.push(LintWarning::LongLine { line: n + 1, chars });
        }
    }

    let non_blank = lines.iter().filter(|l| !l.trim().is_empty()).count();
    if non_blank > DENSE_SLIDE {
        warnings.push(LintWarning::DenseSlide { lines: non_blank });
    }

    let mut code_lines: Option<usize> = None;
    for line in &lines {
        if line.trim_start().starts_with("```") {
            code_lines = match code_lines {
                Some(count) => {
                    if count > LONG_CODE_BLOCK {
                        warnings.push(LintWarning::LongCodeBlock { lines: count });
                    }
                    None
                }
                None => Some(0),
            };
        } else if let Some(count) = code_lines.as_mut() {
            *count += 1;
        }
    }

    warnings
}
