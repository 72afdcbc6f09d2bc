//! JSON import and export of today's tasks.

use std::path::Path;

use super::session::Session;

pub fn run_import(file: &Path) -> super::CliResult {
    let text = std::fs::read_to_string(file)?;
    let mut session = Session::open()?;
    let report = session.engine.import_json(&text)?;
    session.save()?;

    let json = serde_json::json!({
        "imported": report.task_ids.len(),
        "skipped": report.skipped,
        "task_ids": report.task_ids,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn run_export(output: Option<&Path>) -> super::CliResult {
    let session = Session::open()?;
    let json = session.engine.export_document().to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
