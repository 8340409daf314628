use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::{Map, json};

use forma_core::SubmitOutcome;
use forma_model::Value;

use crate::types::{FieldRow, ResetReport, SubmitReport};

pub fn print_fields(rows: &[FieldRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Path"),
        header_cell("Default"),
        header_cell("Initial"),
        header_cell("Prop"),
        header_cell("Rules"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for (idx, row) in rows.iter().enumerate() {
        table.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(row.path.to_string()).add_attribute(Attribute::Bold),
            match &row.default {
                Some(value) => value_cell(value),
                None => dim_cell("-"),
            },
            value_cell(&row.initial),
            Cell::new(&row.value_prop_name),
            count_cell(row.rules),
        ]);
    }
    println!("{table}");
}

pub fn print_submit(report: &SubmitReport, as_json: bool) {
    if as_json {
        println!("{:#}", submit_json(report));
        return;
    }
    println!("Form: {}", report.form);
    println!("Values applied: {}", report.applied);
    match &report.outcome {
        SubmitOutcome::Submitted(values) => {
            println!("Status: submitted");
            println!("{values:#}");
        }
        SubmitOutcome::Rejected => {
            println!("Status: rejected ({} invalid fields)", report.errors.len());
            print_error_table(report);
        }
    }
}

pub fn print_reset(report: &ResetReport) {
    println!("Form: {}", report.form);
    println!("Values applied before reset: {}", report.applied);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Path"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (path, value) in &report.values {
        table.add_row(vec![Cell::new(path.to_string()), value_cell(value)]);
    }
    println!("{table}");
}

/// Machine-readable submit outcome.
fn submit_json(report: &SubmitReport) -> Value {
    let errors: Map<String, Value> = report
        .errors
        .iter()
        .map(|(path, messages)| (path.to_string(), json!(messages)))
        .collect();
    json!({
        "form": report.form,
        "applied": report.applied,
        "submitted": report.outcome.is_submitted(),
        "values": report.outcome.values().cloned().unwrap_or(Value::Null),
        "errors": errors,
    })
}

fn print_error_table(report: &SubmitReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Message")]);
    apply_table_style(&mut table);
    for (path, messages) in &report.errors {
        for message in messages {
            table.add_row(vec![
                Cell::new(path.to_string()).fg(Color::Red),
                Cell::new(message),
            ]);
        }
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => dim_cell("null"),
        other => Cell::new(other.to_string()),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
