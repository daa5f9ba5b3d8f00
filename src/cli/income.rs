//! Income CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::FinflowResult;
use crate::models::Money;
use crate::services::tax_breakdown;

use super::args::IncomeArgs;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Compute net annual income after federal, payroll and state tax
    Net {
        #[command(flatten)]
        income: IncomeArgs,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle an income command
pub fn handle_income_command(settings: &Settings, cmd: IncomeCommands) -> FinflowResult<()> {
    match cmd {
        IncomeCommands::Net { income, json } => {
            let profile = income.profile(settings);
            profile.validate()?;
            let breakdown = tax_breakdown(&profile, &settings.tax);

            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
                return Ok(());
            }

            let dollars = |value: f64| {
                settings.format_money(Money::from_dollars_rounded(value))
            };
            println!(
                "Income: {} {} + {} bonus ({})",
                settings.format_money(profile.salary_amount),
                profile.salary_frequency,
                settings.format_money(profile.bonus_amount),
                if profile.state_code.is_empty() { "no state" } else { profile.state_code.as_str() }
            );
            println!("{}", "-".repeat(40));
            println!("{:24} {:>15}", "Gross annual", dollars(breakdown.gross_annual));
            println!("{:24} {:>15}", "Taxable income", dollars(breakdown.taxable_income));
            println!("{:24} {:>15}", "Federal tax", dollars(breakdown.federal_tax));
            println!("{:24} {:>15}", "Social Security", dollars(breakdown.social_security));
            println!("{:24} {:>15}", "Medicare", dollars(breakdown.medicare));
            println!(
                "{:24} {:>15}",
                format!("State tax ({:.2}%)", breakdown.state_rate * 100.0),
                dollars(breakdown.state_tax)
            );
            println!("{}", "-".repeat(40));
            println!(
                "{:24} {:>15}",
                "Net annual",
                settings.format_money(breakdown.net_annual)
            );
            println!(
                "{:24} {:>14.1}%",
                "Effective rate",
                breakdown.effective_rate() * 100.0
            );
        }
    }

    Ok(())
}
