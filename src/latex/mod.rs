//! Typeset transpiler: slide markup to LaTeX.
//!
//! A slide goes through a fixed list of text-to-text passes. Code is lifted
//! out first and only put back by [`Pass::Code`], so every other pass works on
//! prose alone.

pub mod code;
mod document;
pub mod sanitize;
mod table;

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::directive::detect_columns;

use code::CodeStash;

pub use document::DocumentAssembler;
pub use table::extract_tables;

/// `$$…$$`, or an escaped dollar which never opens one.
static DISPLAY_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\\$|\$\$(.+?)\$\$").expect("valid display math regex")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t]*$").expect("valid heading regex")
});

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").expect("valid bold regex"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\s*][^*\n]*?)\*").expect("valid italic regex"));

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+(.*)$").expect("valid bullet regex"));

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\d+[.)][ \t]+(.*)$").expect("valid ordered item regex"));

const PARAGRAPH_BREAK: &str = "\\par\\medskip";

/// One rewrite step of the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Sanitize,
    Columns,
    Math,
    Headings,
    Emphasis,
    Tables,
    Lists,
    Code,
    Paragraphs,
}

/// Passes in the order they run. Escaping has to happen before anything
/// emits backslashes, bold has to precede italic, and tables have to be
/// gone before list markers are recognised.
pub const PASSES: [Pass; 9] = [
    Pass::Sanitize,
    Pass::Columns,
    Pass::Math,
    Pass::Headings,
    Pass::Emphasis,
    Pass::Tables,
    Pass::Lists,
    Pass::Code,
    Pass::Paragraphs,
];

#[derive(Debug, Clone)]
pub struct Transpiler {
    math: bool,
    heading_rule: Option<String>,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Transpiler {
    pub fn new(math: bool) -> Self {
        Self {
            math,
            heading_rule: None,
        }
    }

    /// Emit `rule` after every level-1 and level-2 heading.
    pub fn with_heading_rule(mut self, rule: impl Into<String>) -> Self {
        self.heading_rule = Some(rule.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.math.enabled)
    }

    /// Transpile a slide body.
    pub fn transpile(&self, text: &str) -> String {
        let (guarded, stash) = code::guard(text);
        PASSES
            .iter()
            .fold(guarded, |text, &pass| self.run_pass(pass, &text, &stash))
    }

    /// Transpile a single line of running text, such as a slide title.
    /// Only symbol, escaping, emphasis and inline code rules apply.
    pub fn transpile_inline(&self, text: &str) -> String {
        let (guarded, stash) = code::guard(text);
        let text = self.run_pass(Pass::Sanitize, &guarded, &stash);
        let text = self.run_pass(Pass::Emphasis, &text, &stash);
        code::expand(&text, &stash)
    }

    pub fn run_pass(&self, pass: Pass, text: &str, stash: &CodeStash) -> String {
        match pass {
            Pass::Sanitize => sanitize::sanitize(text, self.math),
            Pass::Columns => map_columns(text),
            Pass::Math if self.math => map_display_math(text),
            Pass::Math => text.to_string(),
            Pass::Headings => self.map_headings(text),
            Pass::Emphasis => sanitize::map_outside_math(text, self.math, map_emphasis),
            Pass::Tables => extract_tables(text),
            Pass::Lists => wrap_lists(text),
            Pass::Code => code::expand(text, stash),
            Pass::Paragraphs => break_paragraphs(text),
        }
    }

    fn map_headings(&self, text: &str) -> String {
        let rule = self
            .heading_rule
            .as_deref()
            .map(|rule| format!("\n{}", rule.trim_end()))
            .unwrap_or_default();
        HEADING
            .replace_all(text, |caps: &regex::Captures| {
                let title = &caps[2];
                match caps[1].len() {
                    1 | 2 => format!("\\textbf{{\\huge {}}}\\\\[0.5cm]{}", title, rule),
                    3 => format!("\\textbf{{\\Large {}}}\\\\[0.3cm]", title),
                    _ => format!("\\textbf{{{}}}\\\\[0.2cm]", title),
                }
            })
            .into_owned()
    }
}

fn map_columns(text: &str) -> String {
    let Some(set) = detect_columns(text) else {
        return text.to_string();
    };

    let mut parts: Vec<String> = Vec::new();
    if !set.lead.is_empty() {
        parts.push(set.lead.clone());
    }
    if set.len() == 1 {
        parts.extend(set.columns.iter().cloned());
    } else {
        parts.push(format!("\\begin{{multicols}}{{{}}}", set.len()));
        parts.push(set.columns.join("\n\\columnbreak\n"));
        parts.push("\\end{multicols}".to_string());
    }
    parts.join("\n")
}

fn map_display_math(text: &str) -> String {
    DISPLAY_MATH
        .replace_all(text, |caps: &regex::Captures| match caps.get(1) {
            Some(body) => format!("\\[{}\\]", body.as_str()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn map_emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, "\\textbf{$1}");
    ITALIC.replace_all(&bold, "\\textit{$1}").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Itemize,
    Enumerate,
}

impl ListKind {
    fn environment(self) -> &'static str {
        match self {
            ListKind::Itemize => "itemize",
            ListKind::Enumerate => "enumerate",
        }
    }
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(caps) = BULLET_ITEM.captures(line) {
        return caps.get(1).map(|m| (ListKind::Itemize, m.as_str()));
    }
    ORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| (ListKind::Enumerate, m.as_str()))
}

/// Rewrite list lines to `\item` and bracket each maximal run of items of
/// one kind in its environment. Table rows are never items.
fn wrap_lists(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<ListKind> = None;
    let mut in_tabular = false;

    for line in text.split('\n') {
        if line.starts_with("\\begin{tabular}") {
            in_tabular = true;
        } else if line.starts_with("\\end{tabular}") {
            in_tabular = false;
        }
        let item = if in_tabular { None } else { list_item(line) };

        match item {
            Some((kind, content)) => {
                if open != Some(kind) {
                    if let Some(previous) = open {
                        out.push(format!("\\end{{{}}}", previous.environment()));
                    }
                    out.push(format!("\\begin{{{}}}", kind.environment()));
                    open = Some(kind);
                }
                out.push(format!("\\item {}", content));
            }
            None => {
                if let Some(previous) = open.take() {
                    out.push(format!("\\end{{{}}}", previous.environment()));
                }
                out.push(line.to_string());
            }
        }
    }
    if let Some(previous) = open {
        out.push(format!("\\end{{{}}}", previous.environment()));
    }

    out.join("\n")
}

/// Collapse each run of blank lines into one paragraph break. Leading and
/// trailing blank lines are dropped, and listings keep their blank lines.
fn break_paragraphs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_listing = false;
    let mut pending_break = false;

    for line in text.split('\n') {
        if in_listing {
            out.push(line);
            if line.starts_with("\\end{lstlisting}") {
                in_listing = false;
            }
            continue;
        }
        if line.trim().is_empty() {
            pending_break = !out.is_empty();
            continue;
        }
        if pending_break {
            out.push(PARAGRAPH_BREAK);
            pending_break = false;
        }
        if line.starts_with("\\begin{lstlisting}") {
            in_listing = true;
        }
        out.push(line);
    }

    out.join("\n")
}
