//! Fenced blocks and inline code spans.
//!
//! Code is lifted out of the text before any prose pass runs and put back by
//! the code-block pass, so emphasis, list, table and escaping rewrites never
//! see code interiors.

use std::sync::LazyLock;

use regex::Regex;

use crate::latex::sanitize::fold_to_ascii;
use crate::slide::CodeBlock;

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid inline code regex"));

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@@BODH(FENCE|INLINE)(\d+)@@").expect("valid placeholder regex")
});

const FENCE: &str = "```";

/// Code lifted out of a slide, addressed by placeholder number.
#[derive(Debug, Default)]
pub struct CodeStash {
    blocks: Vec<CodeBlock>,
    spans: Vec<String>,
}

impl CodeStash {
    pub fn blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }
}

/// Replace terminated fenced blocks with placeholder lines and inline code
/// spans with placeholder tokens. An opening fence without a closing fence
/// stays in the text as written.
pub fn guard(text: &str) -> (String, CodeStash) {
    let mut stash = CodeStash::default();
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if let Some(info) = line.trim_start().strip_prefix(FENCE) {
            let close = (i + 1..lines.len()).find(|&j| lines[j].trim() == FENCE);
            if let Some(close) = close {
                let language = info
                    .split_whitespace()
                    .next()
                    .map(|lang| lang.trim_start_matches('{').trim_start_matches('.'))
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_string);
                stash.blocks.push(CodeBlock {
                    language,
                    lines: lines[i + 1..close].iter().map(|l| l.to_string()).collect(),
                });
                out.push(format!("@@BODHFENCE{}@@", stash.blocks.len() - 1));
                i = close + 1;
                continue;
            }
        }

        let guarded = INLINE_CODE.replace_all(line, |caps: &regex::Captures| {
            stash.spans.push(caps[1].to_string());
            format!("@@BODHINLINE{}@@", stash.spans.len() - 1)
        });
        out.push(guarded.into_owned());
        i += 1;
    }

    (out.join("\n"), stash)
}

/// Code-block pass: expand placeholders into listing environments and
/// monospace commands.
pub fn expand(text: &str, stash: &CodeStash) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures| {
            let index: usize = caps[2].parse().unwrap_or(usize::MAX);
            match &caps[1] {
                "FENCE" => stash
                    .blocks
                    .get(index)
                    .map(block_to_latex)
                    .unwrap_or_default(),
                _ => stash
                    .spans
                    .get(index)
                    .map(|span| format!("\\texttt{{{}}}", escape_texttt(span)))
                    .unwrap_or_default(),
            }
        })
        .into_owned()
}

fn block_to_latex(block: &CodeBlock) -> String {
    let mut out = String::from("\\begin{lstlisting}");
    if let Some(lang) = block.language.as_deref().and_then(listings_language) {
        out.push_str(&format!("[language={}]", lang));
    }
    out.push('\n');
    for line in &block.lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("\\end{lstlisting}");
    out
}

/// Map a fence info string to a language the listings package ships with.
fn listings_language(lang: &str) -> Option<&'static str> {
    let lang = match lang.to_ascii_lowercase().as_str() {
        "python" | "py" | "python3" => "Python",
        "java" => "Java",
        "c" => "C",
        "cpp" | "c++" | "cxx" => "C++",
        "bash" | "sh" | "shell" | "zsh" => "bash",
        "sql" => "SQL",
        "html" => "HTML",
        "xml" => "XML",
        "tex" | "latex" => "TeX",
        "ruby" | "rb" => "Ruby",
        "matlab" => "Matlab",
        "r" => "R",
        "perl" => "Perl",
        "php" => "PHP",
        "haskell" | "hs" => "Haskell",
        _ => return None,
    };
    Some(lang)
}

fn escape_texttt(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for ch in fold_to_ascii(code).chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '$' | '&' | '%' | '#' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            '^' => out.push_str("\\^{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(ch),
        }
    }
    out
}
