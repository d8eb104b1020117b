use crate::BuildArgs;

pub fn run(args: &BuildArgs) -> Result<(), String> {
    let built = super::build_document(args)?;
    let json = serde_json::to_string_pretty(&built.output.ledger)
        .map_err(|e| format!("cannot serialize ledger: {e}"))?;
    println!("{json}");
    Ok(())
}
