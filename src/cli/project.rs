//! Projection CLI command

use crate::config::settings::Settings;
use crate::models::Money;
use crate::services::projection::{project_at, ProjectionMode};

/// Print what `amount` grows to over 10 and 30 years
pub fn handle_project_command(settings: &Settings, amount: Money, category: &str, rate: f64) {
    let projection = project_at(amount, category, rate);
    let heading = match projection.mode {
        ProjectionMode::WealthPotential => "Wealth potential",
        ProjectionMode::OpportunityCost => "Opportunity cost",
    };

    println!(
        "{} of {} in {} at {:.1}% a year",
        heading,
        settings.format_money(projection.amount),
        if projection.category.is_empty() { "spending" } else { projection.category.as_str() },
        projection.rate * 100.0
    );
    println!("  10 years: {}", settings.format_money(projection.ten_year));
    println!("  30 years: {}", settings.format_money(projection.thirty_year));
}
