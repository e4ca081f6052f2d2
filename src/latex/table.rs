use std::sync::LazyLock;

use regex::Regex;

use crate::slide::TableBlock;

static SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-{3,}:?$").expect("valid separator regex"));

static EMPHASIS_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\text(?:bf|it)\{([^{}]*)\}").expect("valid emphasis regex"));

/// Table pass: rewrite pipe tables into centered `tabular` environments.
///
/// A pipe line starts a table only when the next line is a separator row
/// with a `---` cell for every header column. Following pipe lines are data
/// rows; rows whose width differs from the header are dropped.
pub fn extract_tables(text: &str) -> String {
    if !text.contains('|') {
        return text.to_string();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let Some((mut table, alignment)) = table_start(&lines, i) else {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        };

        i += 2;
        while i < lines.len() && lines[i].contains('|') {
            let row: Vec<String> = split_row(lines[i]).iter().map(|c| plain_cell(c)).collect();
            let width = row.len();
            if !table.push_row(row) {
                log::debug!(
                    "Dropping table row with {} cells (header has {}): {}",
                    width,
                    table.column_count(),
                    lines[i].trim()
                );
            }
            i += 1;
        }
        out.push(table_to_latex(&table, &alignment));
    }

    out.join("\n")
}

/// Header and column alignment if a table begins at line `i`.
fn table_start(lines: &[&str], i: usize) -> Option<(TableBlock, String)> {
    let header_line = lines.get(i)?;
    let separator_line = lines.get(i + 1)?;
    if !header_line.contains('|') || !separator_line.contains('|') {
        return None;
    }

    let header: Vec<String> = split_row(header_line)
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .map(|cell| plain_cell(&cell))
        .collect();
    let separator: Vec<String> = split_row(separator_line)
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect();

    if header.is_empty()
        || separator.len() != header.len()
        || !separator.iter().all(|cell| SEPARATOR_CELL.is_match(cell))
    {
        return None;
    }

    let alignment = separator
        .iter()
        .map(|cell| match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => 'c',
            (false, true) => 'r',
            _ => 'l',
        })
        .collect();

    Some((TableBlock::new(header), alignment))
}

/// Cells of a pipe row, trimmed, without the empty edges produced by
/// leading and trailing pipes.
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Table cells are set without emphasis.
fn plain_cell(cell: &str) -> String {
    let mut cell = cell.to_string();
    while EMPHASIS_COMMAND.is_match(&cell) {
        cell = EMPHASIS_COMMAND.replace_all(&cell, "$1").into_owned();
    }
    cell.replace('*', "")
}

fn table_to_latex(table: &TableBlock, alignment: &str) -> String {
    let mut out = String::new();
    out.push_str("\\begin{center}\n");
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", alignment));
    out.push_str("\\toprule\n");
    out.push_str(&table.header.join(" & "));
    out.push_str(" \\\\\n\\midrule\n");
    for row in &table.rows {
        out.push_str(&row.join(" & "));
        out.push_str(" \\\\\n");
    }
    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");
    out.push_str("\\end{center}");
    out
}
