//! Recurring bill CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::FinflowResult;
use crate::services::{gather_candidates, plan_period, RecurrenceMatcher, SheetService};
use crate::storage::SheetStore;

use super::args::{IncomeArgs, StoreArgs, WindowArgs};

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// List the recurring bills from saved sheets that fall due in a window
    Due {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        income: IncomeArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Only scan these sheets (default: every sheet in the store)
        #[arg(long = "sheet")]
        sheets: Vec<String>,

        /// Save the due bills as a new sheet with this name
        #[arg(long)]
        save_as: Option<String>,
    },
}

/// Handle a recurring command
pub fn handle_recurring_command<S: SheetStore + ?Sized>(
    store: &S,
    service: &SheetService<'_, S>,
    settings: &Settings,
    cmd: RecurringCommands,
) -> FinflowResult<()> {
    match cmd {
        RecurringCommands::Due {
            store: store_args,
            income,
            window,
            sheets,
            save_as,
        } => {
            let store_id = store_args.store_id();
            let sheet_names = if sheets.is_empty() {
                store.list_sheets(&store_id)?
            } else {
                sheets
            };

            let profile = income.profile(settings);
            profile.validate()?;
            let candidates = gather_candidates(store, &store_id, &sheet_names);
            let matcher = RecurrenceMatcher::new(settings.recurrence_iteration_ceiling);
            let plan = plan_period(
                &profile,
                &settings.tax,
                window.duration(settings),
                window.anchor(),
                &candidates,
                &matcher,
            );

            println!(
                "{} ({} to {})",
                plan.window.label(),
                settings.format_date(plan.window.start),
                settings.format_date(plan.window.end)
            );
            println!(
                "Scanned {} sheet(s), {} recurring bill(s)",
                sheet_names.len(),
                candidates.len()
            );
            println!();

            if plan.due_items.is_empty() {
                println!("No recurring bills fall due in this window.");
            } else {
                println!("{:24} {:>12} {:>12} {:>12}", "Category", "Amount", "Repeats", "Due");
                for item in &plan.due_items {
                    let repeats = item
                        .expense
                        .recurrence_frequency
                        .as_ref()
                        .map(|f| f.label().to_string())
                        .unwrap_or_default();
                    println!(
                        "{:24} {:>12} {:>12} {:>12}",
                        item.expense.category,
                        settings.format_money(item.expense.budgeted_amount),
                        repeats,
                        settings.format_date(item.due_date)
                    );
                }
            }

            println!("{}", "-".repeat(64));
            println!(
                "{:24} {:>12}",
                "Period income",
                settings.format_money(plan.window.period_income_total)
            );
            println!("{:24} {:>12}", "Due bills", settings.format_money(plan.due_total()));
            println!("{:24} {:>12}", "Unallocated", settings.format_money(plan.unallocated));

            if let Some(name) = save_as {
                let sheet = plan.into_sheet(name, profile);
                let saved_as = service.save(&store_id, &sheet, false)?;
                println!();
                println!("Saved new sheet '{}' with {} line(s).", saved_as, sheet.items.len());
            }
        }
    }

    Ok(())
}
