use boardkeep_persistence::{RecoveryCheckpoint, SectionKind};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{DiscardReport, IdentityReport, InspectReport, StatusReport};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn print_identity(report: &IdentityReport) {
    println!("Design: {}", report.design.display());
    println!("Identity: {}", report.identity.to_hex());
    println!("Checkpoint: {}", report.checkpoint.display());
    if report.checkpoint_exists {
        println!("Checkpoint exists");
    }
}

pub fn print_inspect(report: &InspectReport) {
    println!("Checkpoint: {}", report.path.display());
    println!("Size: {} bytes", report.size);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Kind"),
        header_cell("Id"),
        header_cell("Schema"),
        header_cell("Bytes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total = 0usize;
    for (index, section) in report.sections.iter().enumerate() {
        total += section.payload_len;
        table.add_row(vec![
            dim_cell(index),
            kind_cell(section.kind),
            Cell::new(&section.id),
            Cell::new(section.schema_version),
            Cell::new(section.payload_len),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(snapshots) = &report.snapshots {
        if snapshots.is_empty() {
            println!("No snapshots");
            return;
        }
        let mut table = Table::new();
        table.set_header(vec!["Id", "Name", "Mode", "Categories"]);
        apply_table_style(&mut table);
        for snapshot in snapshots {
            table.add_row(vec![
                Cell::new(snapshot.id),
                Cell::new(&snapshot.name),
                Cell::new(snapshot.menu_mode.label()),
                Cell::new(snapshot.categories),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_status(report: &StatusReport) {
    println!("Design: {}", report.design.display());
    println!("Identity: {}", report.identity.to_hex());
    println!("Checkpoint: {}", report.checkpoint.display());
    if let Some(time) = report.design_modified {
        println!("Design saved: {}", time.format(TIME_FORMAT));
    }
    match (&report.offer, report.checkpoint_modified) {
        (Some(offer), _) => println!(
            "Recovery available (checkpoint written {})",
            offer.modified_at.format(TIME_FORMAT)
        ),
        (None, Some(time)) => println!(
            "No recovery: checkpoint from {} is not newer than the design",
            time.format(TIME_FORMAT)
        ),
        (None, None) => println!("No recovery: no checkpoint"),
    }
}

pub fn print_list(checkpoints: &[RecoveryCheckpoint]) {
    if checkpoints.is_empty() {
        println!("No checkpoints");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Identity", "Written", "Path"]);
    apply_table_style(&mut table);
    for checkpoint in checkpoints {
        table.add_row(vec![
            Cell::new(checkpoint.identity.to_hex()),
            Cell::new(checkpoint.last_written_at.format(TIME_FORMAT)),
            Cell::new(checkpoint.path.display()),
        ]);
    }
    println!("{table}");
}

pub fn print_discard(report: &DiscardReport) {
    if report.deleted {
        println!("Deleted {}", report.checkpoint.display());
    } else {
        println!("No checkpoint at {}", report.checkpoint.display());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn section_kind_label(kind: SectionKind) -> String {
    match kind {
        SectionKind::Board => "board".to_string(),
        SectionKind::View => "view".to_string(),
        SectionKind::Subwindow => "subwindow".to_string(),
        SectionKind::Unknown(tag) => format!("unknown ({tag})"),
    }
}

fn kind_cell(kind: SectionKind) -> Cell {
    let cell = Cell::new(section_kind_label(kind));
    match kind {
        SectionKind::Board | SectionKind::View => cell.fg(Color::Green),
        SectionKind::Subwindow => cell,
        SectionKind::Unknown(_) => cell.fg(Color::Yellow),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_labels() {
        assert_eq!(section_kind_label(SectionKind::Board), "board");
        assert_eq!(section_kind_label(SectionKind::Unknown(7)), "unknown (7)");
    }
}
