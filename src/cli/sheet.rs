//! Sheet CLI commands
//!
//! List, show and save budget sheets, and move money between their lines.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{FinflowError, FinflowResult};
use crate::models::{BudgetSheet, DurationKind, Money, RecurrenceFrequency, RecurringExpense};
use crate::services::SheetService;
use crate::storage::SheetStore;

use super::args::{parse_date, parse_money, IncomeArgs, StoreArgs, WindowArgs};

/// Sheet subcommands
#[derive(Subcommand)]
pub enum SheetCommands {
    /// List the sheets saved in a store
    List {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show a sheet's lines and allocation totals
    Show {
        #[command(flatten)]
        store: StoreArgs,

        /// Sheet name
        name: String,
    },

    /// Create or update a sheet
    Save {
        #[command(flatten)]
        store: StoreArgs,

        /// Sheet name (blank saves as "MyBudget")
        #[arg(default_value = "")]
        name: String,

        #[command(flatten)]
        income: IncomeArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Line to add or replace: "Category=Amount[@Frequency[:YYYY-MM-DD]]"
        #[arg(long = "item")]
        items: Vec<String>,

        /// Category to remove
        #[arg(long = "remove")]
        remove: Vec<String>,

        /// Scratchpad notes
        #[arg(long)]
        notes: Option<String>,

        /// Also sync the sheet's design
        #[arg(long)]
        sync_design: bool,
    },

    /// Move money from one line to another
    Transfer {
        #[command(flatten)]
        store: StoreArgs,

        /// Sheet name
        name: String,
        /// Source category
        from: String,
        /// Destination category
        to: String,
        /// Amount (defaults to the configured transfer amount)
        #[arg(value_parser = parse_money)]
        amount: Option<Money>,
    },

    /// Move money from the unallocated pool onto a line
    Allocate {
        #[command(flatten)]
        store: StoreArgs,

        /// Sheet name
        name: String,
        /// Category
        category: String,
        /// Amount (defaults to the configured transfer amount)
        #[arg(value_parser = parse_money)]
        amount: Option<Money>,
    },
}

/// Parse "Category=Amount[@Frequency[:YYYY-MM-DD]]"
pub fn parse_item_spec(spec: &str) -> FinflowResult<RecurringExpense> {
    let invalid = |reason: &str| {
        FinflowError::Validation(format!("Invalid item '{}': {}", spec, reason))
    };

    let (category, rest) = spec
        .split_once('=')
        .ok_or_else(|| invalid("expected Category=Amount"))?;
    let category = category.trim();
    if category.is_empty() {
        return Err(invalid("category is empty"));
    }

    let (amount, schedule) = match rest.split_once('@') {
        Some((amount, schedule)) => (amount, Some(schedule)),
        None => (rest, None),
    };
    let amount = parse_money(amount).map_err(|e| invalid(&e))?;
    let mut expense = RecurringExpense::new(category, amount);

    if let Some(schedule) = schedule {
        let (frequency, last_paid) = match schedule.split_once(':') {
            Some((frequency, date)) => (frequency, Some(parse_date(date).map_err(|e| invalid(&e))?)),
            None => (schedule, None),
        };
        expense.recurrence_frequency = Some(RecurrenceFrequency::from_label(frequency));
        expense.last_paid_date = last_paid;
    }

    Ok(expense)
}

fn print_sheet<S: SheetStore + ?Sized>(
    service: &SheetService<'_, S>,
    settings: &Settings,
    sheet: &BudgetSheet,
) {
    let income = service.period_income(sheet);

    println!("{} ({})", sheet.name, sheet.duration);
    println!(
        "Income: {} {} + {} bonus, state {}",
        settings.format_money(sheet.income.salary_amount),
        sheet.income.salary_frequency,
        settings.format_money(sheet.income.bonus_amount),
        sheet.income.state_code
    );
    if let Some(anchor) = sheet.anchor {
        println!("Anchor: {}", settings.format_date(anchor));
    }
    println!("{}", "=".repeat(64));
    println!("{:24} {:>12} {:>12} {:>12}", "Category", "Amount", "Repeats", "Last paid");
    for item in &sheet.items {
        let repeats = item
            .expense
            .recurrence_frequency
            .as_ref()
            .map(|f| f.label().to_string())
            .unwrap_or_default();
        let last_paid = item
            .expense
            .last_paid_date
            .map(|d| settings.format_date(d))
            .unwrap_or_default();
        let marker = if item.expense.is_active { "" } else { " (inactive)" };
        println!(
            "{:24} {:>12} {:>12} {:>12}{}",
            item.category(),
            settings.format_money(item.amount()),
            repeats,
            last_paid,
            marker
        );
    }
    println!("{}", "-".repeat(64));
    println!("{:24} {:>12}", "Period income", settings.format_money(income));
    println!("{:24} {:>12}", "Allocated", settings.format_money(sheet.total_allocated()));
    println!("{:24} {:>12}", "Unallocated", settings.format_money(sheet.unallocated(income)));
    println!("{:24} {:>11.1}%", "Utilization", sheet.utilization_percent(income));
    if !sheet.notes.is_empty() {
        println!();
        println!("Notes: {}", sheet.notes);
    }
}

/// Handle a sheet command
pub fn handle_sheet_command<S: SheetStore + ?Sized>(
    service: &SheetService<'_, S>,
    settings: &Settings,
    cmd: SheetCommands,
) -> FinflowResult<()> {
    match cmd {
        SheetCommands::List { store } => {
            let names = service.list(&store.store_id())?;
            if names.is_empty() {
                println!("No sheets saved in store '{}'.", store.store_id());
            }
            for name in names {
                println!("{}", name);
            }
        }

        SheetCommands::Show { store, name } => {
            let snapshot = service.snapshot(&store.store_id(), &name)?;
            if snapshot.is_empty() {
                println!("Sheet '{}' has not been saved yet; showing a new sheet.", snapshot.sheet_name);
                println!();
            }
            print_sheet(service, settings, &snapshot.into_sheet());
        }

        SheetCommands::Save {
            store,
            name,
            income,
            window,
            items,
            remove,
            notes,
            sync_design,
        } => {
            let store_id = store.store_id();
            let mut sheet = service.snapshot(&store_id, &name)?.into_sheet();

            sheet.income = income.apply_to(sheet.income);
            if let Some(duration) = window.duration.as_deref() {
                sheet.duration = DurationKind::from_label(duration);
            }
            if window.anchor.is_some() {
                sheet.anchor = window.anchor;
            }
            if let Some(notes) = notes {
                sheet.notes = notes;
            }
            for spec in &items {
                sheet.upsert(parse_item_spec(spec)?);
            }
            for category in &remove {
                let index = sheet
                    .find(category)
                    .ok_or_else(|| FinflowError::item_not_found(category.trim()))?;
                sheet.remove_item(index)?;
            }

            let saved_as = service.save(&store_id, &sheet, sync_design)?;
            sheet.name = saved_as.clone();
            println!("Saved sheet '{}' to store '{}'.", saved_as, store_id);
            println!();
            print_sheet(service, settings, &sheet);
        }

        SheetCommands::Transfer {
            store,
            name,
            from,
            to,
            amount,
        } => {
            let amount = amount.unwrap_or(settings.default_transfer_amount);
            let sheet = service.transfer(&store.store_id(), &name, &from, &to, amount)?;
            println!(
                "Moved {} from {} to {}.",
                settings.format_money(amount),
                from.trim(),
                to.trim()
            );
            println!();
            print_sheet(service, settings, &sheet);
        }

        SheetCommands::Allocate {
            store,
            name,
            category,
            amount,
        } => {
            let amount = amount.unwrap_or(settings.default_transfer_amount);
            let sheet = service.allocate(&store.store_id(), &name, &category, amount)?;
            println!("Allocated {} to {}.", settings.format_money(amount), category.trim());
            println!();
            print_sheet(service, settings, &sheet);
        }
    }

    Ok(())
}
