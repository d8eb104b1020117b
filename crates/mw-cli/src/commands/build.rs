use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use mw_build::AssignedId;
use mw_core::TaskLength;

use crate::BuildArgs;

pub fn run(args: &BuildArgs) -> Result<(), String> {
    let built = super::build_document(args)?;
    let doc = &built.document;
    let output = &built.output;

    println!("  Built '{}' successfully ({} elements).", doc.name, doc.len());
    println!();

    if output.ledger.is_empty() {
        println!("  No ids assigned.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Element", "Type", "Assigned"]);
        for entry in output.ledger.entries() {
            let (name, tag) = doc
                .element(entry.element)
                .map(|e| (e.name.as_str(), e.type_tag.as_str()))
                .unwrap_or(("?", "?"));
            table.add_row(vec![name.to_string(), tag.to_string(), describe(&entry.id)]);
        }
        println!("{table}");
    }
    println!();

    println!("  {} ({} total)", "Tasks".bold().underline(), built.ship.task_count());
    for length in [TaskLength::Short, TaskLength::Common, TaskLength::Long] {
        println!("    {:>4} {length}", built.ship.tasks(length).len());
    }
    let counts: Vec<String> = output
        .artifacts
        .task_counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(key, n)| format!("{key}={n}"))
        .collect();
    if !counts.is_empty() {
        println!("    counts: {}", counts.join(", "));
    }
    println!("    {} ladder endpoints", output.artifacts.ladders.len());
    println!("    {} restricted minimap icons", output.artifacts.restricted_icons);
    println!();

    super::check::print_warnings(&output.log);
    Ok(())
}

fn describe(id: &AssignedId) -> String {
    match id {
        AssignedId::Room { room } => room.to_string(),
        AssignedId::Console { console } => console.to_string(),
        AssignedId::LadderPair { top, bottom } => format!("{top} / {bottom}"),
    }
}
