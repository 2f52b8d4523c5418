//! Output formatting - plaintext and JSON.

use crate::mirror::RunSummary;

/// Renders a run summary as plain text.
pub fn format_plain(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Directories: {} created, {} existing\n",
        summary.directories_created, summary.directories_existing
    ));
    out.push_str(&format!(
        "Files: {} compilable, {} headers\n",
        summary.compilable_units, summary.headers
    ));
    out.push_str(&format!(
        "Lines: {} read, {} kept\n",
        summary.lines_read, summary.lines_written
    ));
    if !summary.skipped.is_empty() {
        out.push_str(&format!("SKIPPED ({}):\n", summary.skipped.len()));
        for entry in &summary.skipped {
            out.push_str(&format!("- {}\n", entry));
        }
    }
    out
}

/// Prints a run summary in plain text format.
pub fn print_plain(summary: &RunSummary) {
    print!("{}", format_plain(summary));
}

/// Prints a run summary in JSON format.
pub fn print_json(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"lines_read\": {}, \"lines_written\": {}}}",
                summary.lines_read, summary.lines_written
            );
        }
    }
}
