//! The `examforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = if bank_path.is_dir() {
        examforge_core::parser::load_bank_directory(&bank_path)?
    } else {
        examforge_core::parser::parse_bank(&bank_path)?
    };

    println!("Bank: {} questions", bank.len());

    let warnings = examforge_core::parser::validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .identity
            .as_ref()
            .map(|id| format!("  [{}]", &id[..id.len().min(12)]))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
