/// One raw slide as split from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// 1-based position among the non-blank slides.
    pub index: usize,
    /// Trimmed slide text.
    pub text: String,
}

/// A slide after directive resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlide {
    pub index: usize,
    /// The slide text as written, used by the typeset pipeline.
    pub source: String,
    /// Markup for the HTML pipeline: overlays wrapped, title rules injected,
    /// and column blocks removed (they live in `columns`).
    pub markup: String,
    pub columns: Option<ColumnSet>,
    /// Number of wrapped overlay segments; 0 when overlays are off or absent.
    pub overlay_count: usize,
    /// Overlay containers left open at the end of `markup`. They enclose the
    /// column grid and are closed after it.
    pub open_overlays: usize,
}

/// Which surface syntax produced a column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSyntax {
    /// `::: {.column}` … `:::`
    Attributed,
    /// Bare `:::` separators; odd-indexed segments are columns.
    Bare,
}

/// Column blocks extracted from a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    pub syntax: ColumnSyntax,
    /// Text before the first column marker, usually the slide title.
    pub lead: String,
    /// Trimmed, non-empty column contents in slide order.
    pub columns: Vec<String>,
}

impl ColumnSet {
    /// Number of columns to lay out. Always the number of extracted segments.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A pipe table. Every row has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Append a data row, returning false (and dropping it) when its width
    /// differs from the header.
    pub fn push_row(&mut self, row: Vec<String>) -> bool {
        if row.len() != self.column_count() {
            return false;
        }
        self.rows.push(row);
        true
    }
}

/// A fenced code block with both fences present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_rows_of_wrong_width() {
        let mut table = TableBlock::new(vec!["A".to_string(), "B".to_string()]);
        assert!(table.push_row(vec!["1".to_string(), "2".to_string()]));
        assert!(!table.push_row(vec!["1".to_string()]));
        assert!(!table.push_row(vec!["1".into(), "2".into(), "3".into()]));
        assert_eq!(table.rows.len(), 1);
    }
}
