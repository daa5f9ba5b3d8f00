use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finflow::audit::AuditLogger;
use finflow::cli::args::parse_money;
use finflow::cli::{
    handle_import_command, handle_income_command, handle_period_command, handle_project_command,
    handle_recurring_command, handle_sheet_command,
};
use finflow::config::{paths::FinflowPaths, settings::Settings};
use finflow::models::Money;
use finflow::services::projection::DEFAULT_GROWTH_RATE;
use finflow::services::SheetService;
use finflow::storage::LocalSheetStore;

/// Environment variable holding the log filter
const LOG_ENV: &str = "FINFLOW_LOG";

#[derive(Parser)]
#[command(
    name = "finflow",
    version,
    about = "Budget period engine: take-home pay, budget windows and recurring bills",
    long_about = "FinFlow turns a salary into net take-home pay, works out the budget \
                  window a date falls in and the income attributable to it, and finds \
                  the recurring bills that fall due inside that window."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Net income after tax
    #[command(subcommand)]
    Income(finflow::cli::IncomeCommands),

    /// Budget windows and period income
    #[command(subcommand)]
    Period(finflow::cli::PeriodCommands),

    /// Recurring bills due in a window
    #[command(subcommand)]
    Recurring(finflow::cli::RecurringCommands),

    /// Saved budget sheets
    #[command(subcommand)]
    Sheet(finflow::cli::SheetCommands),

    /// Statement import
    #[command(subcommand)]
    Import(finflow::cli::ImportCommands),

    /// Project what an amount grows to if invested
    Project {
        /// Amount per period
        #[arg(value_parser = parse_money)]
        amount: Money,

        /// Category the amount belongs to
        #[arg(long, default_value = "")]
        category: String,

        /// Annual growth rate as a fraction
        #[arg(long, default_value_t = DEFAULT_GROWTH_RATE)]
        rate: f64,
    },

    /// Show current configuration and paths
    Config {
        /// Also show this many recent audit entries
        #[arg(long, default_value = "0")]
        audit: usize,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = FinflowPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let store = LocalSheetStore::new(&paths);
    let audit = AuditLogger::new(paths.audit_log());
    let service = SheetService::new(&store, &audit, &settings.tax);

    match cli.command {
        Some(Commands::Income(cmd)) => handle_income_command(&settings, cmd)?,
        Some(Commands::Period(cmd)) => handle_period_command(&settings, cmd)?,
        Some(Commands::Recurring(cmd)) => {
            handle_recurring_command(&store, &service, &settings, cmd)?
        }
        Some(Commands::Sheet(cmd)) => handle_sheet_command(&service, &settings, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&service, &settings, cmd)?,
        Some(Commands::Project {
            amount,
            category,
            rate,
        }) => handle_project_command(&settings, amount, &category, rate),
        Some(Commands::Config { audit: count }) => {
            println!("FinFlow Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Sheet stores:     {}", paths.sheets_dir().display());
            println!("Audit log:        {}", audit.path().display());
            println!();
            println!("Settings:");
            println!("  Default duration:      {}", settings.default_duration);
            println!("  Default pay frequency: {}", settings.default_pay_frequency);
            println!(
                "  Federal brackets:      {}",
                settings.tax.federal_brackets.brackets().len()
            );
            println!(
                "  Standard deduction:    {}",
                settings.format_money(settings.tax.standard_deduction)
            );
            println!(
                "  Recurrence ceiling:    {} steps",
                settings.recurrence_iteration_ceiling
            );
            println!(
                "  Transfer amount:       {}",
                settings.format_money(settings.default_transfer_amount)
            );

            if count > 0 {
                println!();
                println!("Recent changes:");
                let entries = audit.read_recent(count)?;
                if entries.is_empty() {
                    println!("  (none)");
                }
                for entry in entries {
                    println!("  {}", entry.format_human_readable());
                }
            }
        }
        None => {
            println!("FinFlow - budget period engine");
            println!();
            println!("Run 'finflow --help' for usage information.");
        }
    }

    Ok(())
}
