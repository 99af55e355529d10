//! Terminal rendering of table pages and alerts with `comfy-table`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use sis_core::{Alert, AlertKind, AlertSurface, PaginationMode, TableView};

/// How a page is drawn.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    styled: bool,
    plain: bool,
}

impl RenderOptions {
    /// Rounded UTF-8 borders sized to the terminal, colored when `styled`.
    pub fn terminal(styled: bool) -> Self {
        Self {
            styled,
            plain: false,
        }
    }

    /// Markdown-style ASCII with no terminal detection. Stable across machines.
    pub fn plain() -> Self {
        Self {
            styled: false,
            plain: true,
        }
    }
}

/// Build the table for one page. Loading placeholders render as blank rows.
pub fn render_table(view: &TableView, options: &RenderOptions) -> Table {
    let mut table = Table::new();
    if options.plain {
        table
            .load_preset(ASCII_MARKDOWN)
            .set_content_arrangement(ContentArrangement::Disabled)
            .force_no_tty();
    } else {
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
    }
    table.set_header(
        view.columns
            .iter()
            .map(|column| header_cell(column.header, options.styled)),
    );
    for row in view.visible_rows() {
        table.add_row(row.iter().map(Cell::new));
    }
    table
}

/// The table followed by its pagination footer.
pub fn render_page(view: &TableView, options: &RenderOptions) -> String {
    format!("{}\n{}", render_table(view, options), footer(view))
}

/// "Page X of Y (N records)", or a loading note while rows are pending.
pub fn footer(view: &TableView) -> String {
    if view.loading {
        return format!("{} (loading)", view.page_label());
    }
    let total = match view.mode {
        PaginationMode::Server { total_count } => total_count,
        PaginationMode::Client => view.rows.len(),
    };
    let noun = if total == 1 { "record" } else { "records" };
    format!("{} ({total} {noun})", view.page_label())
}

/// One-line rendering of an alert without its buttons.
pub fn alert_text<A>(alert: &Alert<A>, styled: bool) -> String {
    let tag = format!("[{}]", alert.kind);
    let tag = if styled {
        let color = match alert.kind {
            AlertKind::Success => "32",
            AlertKind::Info => "36",
            AlertKind::Warning => "33",
            AlertKind::Danger => "31",
        };
        format!("\x1b[1;{color}m{tag}\x1b[0m")
    } else {
        tag
    };
    format!("{tag} {}: {}", alert.title, alert.message)
}

/// Alert lines from stacked surfaces, topmost first.
///
/// Lines on the same surface keep their order.
pub fn stack_alerts(mut layers: Vec<(AlertSurface, String)>) -> Vec<String> {
    layers.sort_by_key(|(surface, _)| std::cmp::Reverse(surface.z_index()));
    layers.into_iter().map(|(_, text)| text).collect()
}

fn header_cell(label: &str, styled: bool) -> Cell {
    let cell = Cell::new(label);
    if styled {
        cell.add_attribute(Attribute::Bold).fg(Color::Cyan)
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sis_core::ColumnDescriptor;
    use sis_model::Program;

    fn view(rows: usize, total_count: usize, loading: bool) -> TableView {
        TableView {
            columns: ColumnDescriptor::for_entity::<Program>(),
            rows: vec![vec![String::new(); 3]; rows],
            page_index: 0,
            page_size: 5,
            mode: PaginationMode::Server { total_count },
            loading,
        }
    }

    #[test]
    fn test_footer() {
        assert_eq!(footer(&view(1, 1, false)), "Page 1 of 1 (1 record)");
        assert_eq!(footer(&view(0, 0, false)), "Page 1 of 1 (0 records)");
        assert_eq!(footer(&view(5, 0, true)), "Page 1 of 1 (loading)");
    }

    #[test]
    fn test_alert_text() {
        let alert = Alert::<()>::simple(AlertKind::Danger, "Error connecting to the server.");
        assert_eq!(
            alert_text(&alert, false),
            "[danger] Notice: Error connecting to the server."
        );
        assert!(alert_text(&alert, true).contains("\x1b[1;31m"));
    }

    #[test]
    fn test_modal_alert_prints_above_page_alert() {
        let page = Alert::<()>::simple(AlertKind::Danger, "Error connecting to the server.");
        let modal = Alert::<()>::simple(AlertKind::Success, "College added successfully.");
        let lines = stack_alerts(vec![
            (AlertSurface::Page, alert_text(&page, false)),
            (AlertSurface::Modal, alert_text(&modal, false)),
        ]);
        assert_eq!(
            lines,
            [
                "[success] Notice: College added successfully.",
                "[danger] Notice: Error connecting to the server.",
            ]
        );
        assert!(stack_alerts(Vec::new()).is_empty());
    }
}
