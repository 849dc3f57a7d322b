//! Text rendering for CLI output

use codecountlib::{FileType, NodeKind, ReportTable, TableRow};
use console::Style;

/// Width of each count column
const CELL_WIDTH: usize = 10;

/// Marker shown next to nodes that could not be read
const UNREADABLE: &str = "unreadable";

/// Styles used by the table renderer
struct Theme {
    title: Style,
    header: Style,
    directory: Style,
    error: Style,
    total: Style,
}

impl Theme {
    fn new() -> Self {
        Self {
            title: Style::new().bold(),
            header: Style::new().bold(),
            directory: Style::new().blue(),
            error: Style::new().red(),
            total: Style::new().bold(),
        }
    }
}

/// Render a report table as aligned text.
pub fn render_table(table: &ReportTable) -> String {
    let theme = Theme::new();
    let name_width = table.label_width().max(table.headers.first().map_or(0, |h| h.len()));
    let count_columns = table.headers.len().saturating_sub(1);
    let separator = "-".repeat(name_width + (CELL_WIDTH + 1) * count_columns);

    let mut out = String::new();
    out.push_str(&format!("{}\n", theme.title.apply_to(&table.title)));

    let mut header = String::new();
    for (i, name) in table.headers.iter().enumerate() {
        if i == 0 {
            header.push_str(&format!("{:<width$}", name, width = name_width));
        } else {
            header.push_str(&format!(" {:>width$}", name, width = CELL_WIDTH));
        }
    }
    out.push_str(&format!("{}\n", theme.header.apply_to(header)));
    out.push_str(&separator);
    out.push('\n');

    for row in &table.rows {
        let label = format!("{:<width$}", row.label, width = name_width);
        let label = if row.kind == NodeKind::Directory {
            theme.directory.apply_to(label).to_string()
        } else {
            label
        };
        out.push_str(&label);
        out.push_str(&format_cells(row));
        if row.error.is_some() {
            out.push_str(&format!("  {}", theme.error.apply_to(UNREADABLE)));
        }
        out.push('\n');
    }

    out.push_str(&separator);
    out.push('\n');
    let footer = format!(
        "{:<width$}{}",
        table.footer.label,
        format_cells(&table.footer),
        width = name_width
    );
    out.push_str(&format!("{}\n", theme.total.apply_to(footer)));
    out
}

fn format_cells(row: &TableRow) -> String {
    row.values
        .iter()
        .map(|value| format!(" {:>width$}", value, width = CELL_WIDTH))
        .collect()
}

/// Render the configured file types, one per line.
pub fn render_types(types: &[FileType]) -> String {
    let width = types.iter().map(|t| t.name.len()).max().unwrap_or(0);
    types
        .iter()
        .map(|t| format!("{:<width$}  {}\n", t.name, t.suffix, width = width))
        .collect()
}

/// Render the details of unreadable nodes, for the end of a table.
pub fn render_errors(table: &ReportTable) -> String {
    let style = Style::new().red();
    table
        .rows
        .iter()
        .filter_map(|row| {
            let err = row.error.as_ref()?;
            let name = row.label.trim_start();
            Some(format!("{} {}: {}\n", style.apply_to(UNREADABLE), name, err))
        })
        .collect()
}
