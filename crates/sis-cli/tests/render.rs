use sis_cli::render::{RenderOptions, render_page};
use sis_core::{ColumnDescriptor, PaginationMode, TableView};
use sis_model::College;

fn first_page_of_colleges() -> TableView {
    let rows = (1..=5)
        .map(|n| vec![format!("C{n:03}"), format!("College {n}")])
        .collect();
    TableView {
        columns: ColumnDescriptor::for_entity::<College>(),
        rows,
        page_index: 0,
        page_size: 5,
        mode: PaginationMode::Server { total_count: 23 },
        loading: false,
    }
}

#[test]
fn first_page_of_twenty_three_colleges() {
    let page = render_page(&first_page_of_colleges(), &RenderOptions::plain());
    insta::assert_snapshot!(page, @r"
    | College Code | College Name |
    |--------------|--------------|
    | C001         | College 1    |
    | C002         | College 2    |
    | C003         | College 3    |
    | C004         | College 4    |
    | C005         | College 5    |
    Page 1 of 5 (23 records)
    ");
}

#[test]
fn loading_page_renders_blank_rows() {
    let mut view = first_page_of_colleges();
    view.rows = vec![vec![String::new(); 2]; 5];
    view.loading = true;
    view.mode = PaginationMode::Server { total_count: 0 };

    let page = render_page(&view, &RenderOptions::plain());
    let lines: Vec<&str> = page.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[2], "|              |              |");
    assert_eq!(lines[7], "Page 1 of 1 (loading)");
}
