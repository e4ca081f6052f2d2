//! Unicode sanitization and reserved-character escaping.
//!
//! pdfLaTeX with T1 fonts cannot set emoji and most symbols directly. Known
//! glyphs are replaced by commands; everything else that is not ASCII is
//! folded through NFKD and dropped if it has no ASCII base. Every
//! replacement is ASCII, so running the pass again changes nothing.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Math spans, plus escaped backslashes and dollars which are never math.
static MATH_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\\\|\\\$|\$\$.+?\$\$|\\\[.+?\\\]|\\\(.+?\\\)|\$[^$\n]+?\$")
        .expect("valid math span regex")
});

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}[ \t]").expect("valid heading regex"));

const SYMBOLS: &[(&str, &str)] = &[
    // Status marks
    ("✅", "\\ensuremath{\\checkmark}"),
    ("✔", "\\ensuremath{\\checkmark}"),
    ("✓", "\\ensuremath{\\checkmark}"),
    ("☑", "\\ensuremath{\\checkmark}"),
    ("❌", "\\ensuremath{\\times}"),
    ("❎", "\\ensuremath{\\times}"),
    ("✗", "\\ensuremath{\\times}"),
    ("✘", "\\ensuremath{\\times}"),
    ("✖", "\\ensuremath{\\times}"),
    ("⚠", "\\textbf{!}"),
    ("❗", "\\textbf{!}"),
    ("❓", "\\textbf{?}"),
    ("⭐", "\\ensuremath{\\star}"),
    ("★", "\\ensuremath{\\star}"),
    ("☆", "\\ensuremath{\\star}"),
    ("👉", "\\ensuremath{\\Rightarrow}"),
    // Arrows
    ("→", "\\ensuremath{\\rightarrow}"),
    ("←", "\\ensuremath{\\leftarrow}"),
    ("↔", "\\ensuremath{\\leftrightarrow}"),
    ("↑", "\\ensuremath{\\uparrow}"),
    ("↓", "\\ensuremath{\\downarrow}"),
    ("⇒", "\\ensuremath{\\Rightarrow}"),
    ("⇐", "\\ensuremath{\\Leftarrow}"),
    ("⇔", "\\ensuremath{\\Leftrightarrow}"),
    ("➜", "\\ensuremath{\\rightarrow}"),
    ("➡", "\\ensuremath{\\rightarrow}"),
    // Math symbols
    ("≤", "\\ensuremath{\\leq}"),
    ("≥", "\\ensuremath{\\geq}"),
    ("≠", "\\ensuremath{\\neq}"),
    ("≈", "\\ensuremath{\\approx}"),
    ("±", "\\ensuremath{\\pm}"),
    ("×", "\\ensuremath{\\times}"),
    ("÷", "\\ensuremath{\\div}"),
    ("∞", "\\ensuremath{\\infty}"),
    ("√", "\\ensuremath{\\surd}"),
    ("∑", "\\ensuremath{\\sum}"),
    ("∫", "\\ensuremath{\\int}"),
    ("∈", "\\ensuremath{\\in}"),
    ("°", "\\textdegree{}"),
    // Greek
    ("α", "\\ensuremath{\\alpha}"),
    ("β", "\\ensuremath{\\beta}"),
    ("γ", "\\ensuremath{\\gamma}"),
    ("δ", "\\ensuremath{\\delta}"),
    ("ε", "\\ensuremath{\\epsilon}"),
    ("θ", "\\ensuremath{\\theta}"),
    ("λ", "\\ensuremath{\\lambda}"),
    ("μ", "\\ensuremath{\\mu}"),
    ("π", "\\ensuremath{\\pi}"),
    ("σ", "\\ensuremath{\\sigma}"),
    ("φ", "\\ensuremath{\\phi}"),
    ("ω", "\\ensuremath{\\omega}"),
    ("Δ", "\\ensuremath{\\Delta}"),
    ("Σ", "\\ensuremath{\\Sigma}"),
    ("Ω", "\\ensuremath{\\Omega}"),
    // Text symbols
    ("•", "\\textbullet{}"),
    ("…", "\\ldots{}"),
    ("©", "\\textcopyright{}"),
    ("®", "\\textregistered{}"),
    ("™", "\\texttrademark{}"),
    ("℠", "\\textsuperscript{SM}"),
    ("€", "\\texteuro{}"),
    ("£", "\\pounds{}"),
    ("¥", "\\textyen{}"),
    ("§", "\\S{}"),
    // Smart punctuation
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
    ("\u{201E}", "\""),
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{2013}", "--"),
    ("\u{2014}", "---"),
    ("\u{00A0}", " "),
    // Emoji presentation selector and joiner carry no glyph of their own
    ("\u{FE0F}", ""),
    ("\u{200D}", ""),
];

/// Pass 1: replace known symbols, fold whatever non-ASCII text remains, and
/// escape reserved characters outside math.
///
/// Folding comes before escaping because compatibility forms such as `％`
/// decompose to reserved characters.
pub fn sanitize(text: &str, math: bool) -> String {
    let mut out = replace_symbols(text);
    if !out.is_ascii() {
        out = fold_to_ascii(&out);
    }
    map_outside_math(&out, math, |prose| escape_reserved(prose, !math))
}

pub fn replace_symbols(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (symbol, replacement) in SYMBOLS {
        if out.contains(symbol) {
            out = out.replace(symbol, replacement);
        }
    }
    out
}

/// Decompose and keep the ASCII part; characters without an ASCII base
/// disappear.
pub fn fold_to_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Apply `f` to the text between math spans. With `math` off nothing is
/// treated as math.
pub fn map_outside_math(text: &str, math: bool, f: impl Fn(&str) -> String) -> String {
    if !math {
        return f(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut prose_start = 0;
    for m in MATH_SPAN.find_iter(text) {
        if m.as_str() == "\\\\" || m.as_str() == "\\$" {
            continue;
        }
        out.push_str(&f(&text[prose_start..m.start()]));
        out.push_str(m.as_str());
        prose_start = m.end();
    }
    out.push_str(&f(&text[prose_start..]));
    out
}

/// Escape `%`, `&`, `_`, `^`, `~` and non-heading `#` (and `$` when
/// `dollars`) that are not already escaped.
fn escape_reserved(text: &str, dollars: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (n, line) in text.split('\n').enumerate() {
        if n > 0 {
            out.push('\n');
        }
        let marker_len = HEADING_MARKER.find(line).map_or(0, |m| m.end());
        out.push_str(&line[..marker_len]);

        let mut prev = None;
        for ch in line[marker_len..].chars() {
            let escaped = prev == Some('\\');
            match ch {
                '^' if !escaped => out.push_str("\\^{}"),
                '~' if !escaped => out.push_str("\\textasciitilde{}"),
                '%' | '&' | '_' | '#' if !escaped => {
                    out.push('\\');
                    out.push(ch);
                }
                '$' if dollars && !escaped => out.push_str("\\$"),
                _ => out.push(ch),
            }
            prev = Some(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_become_commands() {
        assert_eq!(sanitize("Done ✅", true), "Done \\ensuremath{\\checkmark}");
        assert_eq!(sanitize("a → b", true), "a \\ensuremath{\\rightarrow} b");
        assert_eq!(sanitize("✔️ ok", true), "\\ensuremath{\\checkmark} ok");
    }

    #[test]
    fn smart_punctuation_becomes_ascii() {
        assert_eq!(
            sanitize("\u{201C}quoted\u{201D} \u{2014} it\u{2019}s 1\u{2013}2", true),
            "\"quoted\" --- it's 1--2"
        );
    }

    #[test]
    fn unknown_non_ascii_is_folded_or_dropped() {
        assert_eq!(sanitize("Café naïve 🚀 launch", true), "Cafe naive  launch");
        assert_eq!(sanitize("ﬁne", true), "fine");
    }

    #[test]
    fn reserved_characters_are_escaped_outside_math() {
        assert_eq!(sanitize("50% of R&D", true), "50\\% of R\\&D");
        assert_eq!(sanitize("snake_case and $x_i$", true), "snake\\_case and $x_i$");
        assert_eq!(sanitize("$$a_1 & b$$", true), "$$a_1 & b$$");
    }

    #[test]
    fn heading_markers_survive_but_hashes_are_escaped() {
        assert_eq!(sanitize("## Issue #4", true), "## Issue \\#4");
        assert_eq!(sanitize("#hashtag", true), "\\#hashtag");
    }

    #[test]
    fn carets_and_tildes_are_escaped_outside_math() {
        assert_eq!(sanitize("Use 2^10 ~ x", true), "Use 2\\^{}10 \\textasciitilde{} x");
        assert_eq!(sanitize("$x^2$ and ~", true), "$x^2$ and \\textasciitilde{}");
        assert_eq!(sanitize("20°C", true), "20\\textdegree{}C");
        let once = sanitize("a^b~c", false);
        assert_eq!(sanitize(&once, false), once);
    }

    #[test]
    fn dollars_are_escaped_when_math_is_off() {
        assert_eq!(sanitize("costs $5 or $6", false), "costs \\$5 or \\$6");
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let input = "✅ “Done” — 50% of R&D, π ≈ 3.14, $x_1$ & é_x";
        let once = sanitize(input, true);
        assert_eq!(sanitize(&once, true), once);
    }

    #[test]
    fn compatibility_forms_are_escaped_after_folding() {
        assert_eq!(sanitize("50％", true), "50\\%");
        assert_eq!(sanitize(&sanitize("＃１", true), true), "\\#1");
    }

    #[test]
    fn already_escaped_characters_are_left_alone() {
        assert_eq!(sanitize("100\\% and \\_", true), "100\\% and \\_");
    }
}
