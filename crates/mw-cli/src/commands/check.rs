use colored::Colorize;
use mw_build::BuildLog;

use crate::BuildArgs;

pub fn run(args: &BuildArgs) -> Result<(), String> {
    let built = super::build_document(args)?;

    print_warnings(&built.output.log);
    println!("  All checks passed for '{}'.", built.document.name);
    Ok(())
}

/// Print every warning in the log, then a count.
pub fn print_warnings(log: &BuildLog) {
    if log.is_empty() {
        return;
    }
    for event in log.events() {
        println!("  {}   {}", "WARN".yellow().bold(), event.message);
    }
    println!("  {} warning{}", log.len(), if log.len() == 1 { "" } else { "s" });
    println!();
}
