//! Plain-text table rendering for listings and reports.

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct TableColumn {
    pub header: &'static str,
    pub alignment: Alignment,
    /// Cells wider than this are cut and suffixed with `…`.
    pub max_width: Option<usize>,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Left,
            max_width: None,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Right,
            max_width: None,
        }
    }

    pub const fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.chars().count(), usize::max);
                column.max_width.map_or(widest, |max| widest.min(max))
            })
            .collect()
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, &width))| {
                let text = fit(cells.get(idx).map(String::as_str).unwrap_or(""), width);
                match column.alignment {
                    Alignment::Left => format!("{text:<width$}"),
                    Alignment::Right => format!("{text:>width$}"),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut lines = vec![self.render_row(&headers, &widths), rule.join("  ")];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Width left for a free-text column once the fixed columns are laid out.
pub fn flexible_width(fixed: usize) -> usize {
    let terminal = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(100);
    terminal.saturating_sub(fixed).clamp(12, 60)
}
