//! Budget window CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::FinflowResult;
use crate::services::period::paycheck_amount;
use crate::services::{compute_budget_window, compute_net_annual_income, next_window};

use super::args::{IncomeArgs, WindowArgs};

/// Period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Show the window a budget covers and the income attributable to it
    Window {
        #[command(flatten)]
        income: IncomeArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Also show this many following windows
        #[arg(long, default_value = "0")]
        following: usize,
    },
}

/// Handle a period command
pub fn handle_period_command(settings: &Settings, cmd: PeriodCommands) -> FinflowResult<()> {
    match cmd {
        PeriodCommands::Window {
            income,
            window,
            following,
        } => {
            let profile = income.profile(settings);
            profile.validate()?;
            let net_annual = compute_net_annual_income(&profile, &settings.tax);

            let mut current = compute_budget_window(
                net_annual,
                profile.salary_frequency,
                window.duration(settings),
                window.anchor(),
            );

            println!("Net annual income: {}", settings.format_money(net_annual));
            println!(
                "Per paycheck ({}): {}",
                profile.salary_frequency,
                settings.format_money(paycheck_amount(net_annual, profile.salary_frequency))
            );
            println!();
            println!("{:28} {:>12} {:>12} {:>14}", "Window", "Start", "End", "Income");
            for _ in 0..=following {
                println!(
                    "{:28} {:>12} {:>12} {:>14}",
                    current.label(),
                    settings.format_date(current.start),
                    settings.format_date(current.end),
                    settings.format_money(current.period_income_total)
                );
                current = next_window(&current, net_annual);
            }
        }
    }

    Ok(())
}
