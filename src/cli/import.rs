//! Statement import CLI commands

use std::io::Read;

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{FinflowError, FinflowResult};
use crate::services::import::{aggregate_by_category, categorize_by_name, parse_statement_text};
use crate::services::SheetService;
use crate::storage::SheetStore;

use super::args::StoreArgs;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Parse spending out of pasted statement text
    Statement {
        /// Text file with the statement, or "-" for stdin
        file: String,

        #[command(flatten)]
        store: StoreArgs,

        /// Sheet whose categories are matched against descriptions
        #[arg(long)]
        sheet: Option<String>,

        /// Year for dates written without one (defaults to this year)
        #[arg(long)]
        year: Option<i32>,

        /// Add the category totals onto the sheet's lines and save it
        #[arg(long, requires = "sheet")]
        apply: bool,
    },
}

fn read_input(file: &str) -> FinflowResult<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| FinflowError::Import(format!("Failed to read stdin: {}", e)))?;
        return Ok(text);
    }
    std::fs::read_to_string(file)
        .map_err(|e| FinflowError::Import(format!("Failed to read {}: {}", file, e)))
}

/// Handle an import command
pub fn handle_import_command<S: SheetStore + ?Sized>(
    service: &SheetService<'_, S>,
    settings: &Settings,
    cmd: ImportCommands,
) -> FinflowResult<()> {
    match cmd {
        ImportCommands::Statement {
            file,
            store,
            sheet,
            year,
            apply,
        } => {
            let text = read_input(&file)?;
            let year = year.unwrap_or_else(|| Local::now().year());
            let mut lines = parse_statement_text(&text, year)?;

            if lines.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }

            let store_id = store.store_id();
            if let Some(name) = &sheet {
                let snapshot = service.snapshot(&store_id, name)?;
                let categories: Vec<&str> = snapshot.items.iter().map(|i| i.category()).collect();
                let matched = categorize_by_name(&mut lines, &categories);
                tracing::debug!(matched, "categorized statement lines by name");
            }

            println!("{:12} {:40} {:>12} {}", "Date", "Description", "Amount", "Category");
            for line in &lines {
                let date = line
                    .date
                    .map(|d| settings.format_date(d))
                    .unwrap_or_else(|| line.raw_date.clone());
                println!(
                    "{:12} {:40} {:>12} {}",
                    date,
                    line.description,
                    settings.format_money(line.amount),
                    line.category
                );
            }

            let totals = aggregate_by_category(&lines);
            println!();
            println!("Totals by category:");
            for (category, total) in &totals {
                println!("  {:24} {:>12}", category, settings.format_money(*total));
            }

            if apply {
                if let Some(name) = &sheet {
                    let (_, summary) = service.import_totals(&store_id, name, &totals)?;
                    println!();
                    println!("Applied {} categor(ies) to '{}'.", summary.applied.len(), name);
                    if !summary.unmatched.is_empty() {
                        println!("No matching line for: {}", summary.unmatched.join(", "));
                    }
                    if summary.uncategorized.is_positive() {
                        println!(
                            "Left uncategorized: {}",
                            settings.format_money(summary.uncategorized)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
