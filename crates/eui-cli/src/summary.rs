use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use eui_cli::pipeline::StageReport;

/// Prints one row per written file, grouped by stage.
pub fn print_summary(root: &Path, reports: &[StageReport]) {
    println!("Root: {}", root.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Output"),
        header_cell("Rows"),
        header_cell("Notes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    let mut total_files = 0usize;
    for report in reports {
        let notes = if report.notes.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(report.notes.join("\n")).fg(Color::Yellow)
        };
        if report.outputs.is_empty() {
            table.add_row(vec![stage_cell(report.stage), dim_cell("-"), dim_cell("-"), notes]);
            continue;
        }
        for (i, output) in report.outputs.iter().enumerate() {
            total_files += 1;
            let stage = if i == 0 {
                stage_cell(report.stage)
            } else {
                Cell::new("")
            };
            let notes = if i == 0 { notes.clone() } else { Cell::new("") };
            table.add_row(vec![
                stage,
                Cell::new(display_relative(root, &output.path)),
                rows_cell(output.rows),
                notes,
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{total_files} files"))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(16)),
        ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(stage: &str) -> Cell {
    Cell::new(stage)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn rows_cell(rows: usize) -> Cell {
    if rows > 0 {
        Cell::new(rows)
    } else {
        Cell::new(rows).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
