use crate::sync::{definitions, ErrorCategory};
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(definitions())?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Category")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
            Cell::new("Is a")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
            Cell::new("Description")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
        ]);

    for def in definitions() {
        table.add_row(vec![
            Cell::new(def.name).fg(Color::Green),
            Cell::new(parent_names(def.parents)),
            Cell::new(def.description),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn parent_names(parents: &[ErrorCategory]) -> String {
    if parents.is_empty() {
        return "-".to_string();
    }
    parents
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}
