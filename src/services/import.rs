//! Statement import
//!
//! Pulls spending out of text pasted from a bank statement. Any line with a
//! date and a two-decimal amount becomes a transaction; the rest of the line
//! is the description. Transactions are then summed per category and the
//! totals added onto the matching lines of a budget sheet.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::error::{FinflowError, FinflowResult};
use crate::models::{BudgetSheet, Money, UNCATEGORIZED};

const DATE_PATTERN: &str = r"\d{1,2}/\d{1,2}(?:/\d{2,4})?|\d{4}-\d{2}-\d{2}";
const AMOUNT_PATTERN: &str = r"-?\$?[\d,]+\.\d{2}";
const ACCOUNT_NUMBER_PATTERN: &str = r"\b\d{4,}\b";
const BOILERPLATE_PATTERN: &str = r"(?i)purchase authorized on";

/// One transaction found in a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementLine {
    /// 1-based line in the pasted text
    pub line_number: usize,
    /// Date exactly as it appeared, with the default year added when missing
    pub raw_date: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    /// Always positive; statements disagree on the sign of debits
    pub amount: Money,
    pub category: String,
}

/// Compiled patterns for statement parsing
pub struct StatementParser {
    date: Regex,
    amount: Regex,
    account_number: Regex,
    boilerplate: Regex,
    whitespace: Regex,
}

fn compile(pattern: &str) -> FinflowResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| FinflowError::Import(format!("Invalid pattern {}: {}", pattern, e)))
}

impl StatementParser {
    pub fn new() -> FinflowResult<Self> {
        Ok(Self {
            date: compile(DATE_PATTERN)?,
            amount: compile(AMOUNT_PATTERN)?,
            account_number: compile(ACCOUNT_NUMBER_PATTERN)?,
            boilerplate: compile(BOILERPLATE_PATTERN)?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Parse every transaction line. Lines without both a date and an
    /// amount, or whose description is a single character, are skipped.
    pub fn parse(&self, text: &str, default_year: i32) -> Vec<StatementLine> {
        text.lines()
            .enumerate()
            .filter_map(|(index, line)| self.parse_line(index + 1, line, default_year))
            .collect()
    }

    fn parse_line(&self, line_number: usize, line: &str, default_year: i32) -> Option<StatementLine> {
        let date_match = self.date.find(line)?.as_str();
        let amount_match = self.amount.find(line)?.as_str();

        let amount = match Money::parse(amount_match) {
            Ok(amount) => amount.abs(),
            Err(e) => {
                tracing::debug!(line_number, error = %e, "skipping statement line");
                return None;
            }
        };

        let raw_date = if date_match.len() <= 5 && date_match.contains('/') {
            format!("{}/{}", date_match, default_year)
        } else {
            date_match.to_string()
        };

        let stripped = line.replacen(date_match, "", 1).replacen(amount_match, "", 1);
        let masked = self.account_number.replace_all(&stripped, "####");
        let cleaned = self.boilerplate.replace(&masked, "");
        let description = self.whitespace.replace_all(cleaned.trim(), " ").into_owned();

        if description.chars().count() <= 1 {
            return None;
        }

        Some(StatementLine {
            line_number,
            date: parse_statement_date(&raw_date),
            raw_date,
            description,
            amount,
            category: UNCATEGORIZED.to_string(),
        })
    }
}

/// Read `M/D/YYYY`, `M/D/YY` or `YYYY-MM-DD`. Two-digit years are 20xx.
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }

    let mut parts = raw.split('/').map(|p| p.parse::<u32>().ok());
    let month = parts.next()??;
    let day = parts.next()??;
    let year = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    let year = match year {
        0..=99 => 2000 + year as i32,
        1000..=9999 => year as i32,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse pasted statement text with freshly compiled patterns
pub fn parse_statement_text(text: &str, default_year: i32) -> FinflowResult<Vec<StatementLine>> {
    let lines = StatementParser::new()?.parse(text, default_year);
    tracing::debug!(count = lines.len(), "parsed statement");
    Ok(lines)
}

/// Give uncategorized lines the first category whose name appears in their
/// description, ignoring case. Returns how many lines were assigned.
pub fn categorize_by_name(lines: &mut [StatementLine], categories: &[&str]) -> usize {
    let names: Vec<(String, &str)> = categories
        .iter()
        .filter(|c| c.trim().len() >= 3 && **c != UNCATEGORIZED)
        .map(|c| (c.trim().to_lowercase(), *c))
        .collect();

    let mut assigned = 0;
    for line in lines.iter_mut().filter(|l| l.category == UNCATEGORIZED) {
        let description = line.description.to_lowercase();
        if let Some((_, name)) = names.iter().find(|(key, _)| description.contains(key.as_str())) {
            line.category = (*name).to_string();
            assigned += 1;
        }
    }
    assigned
}

/// Sum amounts per category. A blank category counts as uncategorized.
pub fn aggregate_by_category(lines: &[StatementLine]) -> BTreeMap<String, Money> {
    let mut totals = BTreeMap::new();
    for line in lines {
        let category = match line.category.trim() {
            "" => UNCATEGORIZED,
            other => other,
        };
        *totals.entry(category.to_string()).or_insert_with(Money::zero) += line.amount;
    }
    totals
}

/// What applying an import changed on a sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub applied: BTreeMap<String, Money>,
    /// Categories with spending but no line on the sheet
    pub unmatched: Vec<String>,
    pub uncategorized: Money,
}

/// Add aggregated spending onto the sheet's matching lines
pub fn apply_import(sheet: &mut BudgetSheet, totals: &BTreeMap<String, Money>) -> ImportSummary {
    let unmatched = sheet.apply_category_totals(totals);
    let applied = totals
        .iter()
        .filter(|(category, amount)| {
            category.as_str() != UNCATEGORIZED
                && amount.is_positive()
                && !unmatched.contains(*category)
        })
        .map(|(category, amount)| (category.clone(), *amount))
        .collect();

    let summary = ImportSummary {
        applied,
        unmatched,
        uncategorized: totals.get(UNCATEGORIZED).copied().unwrap_or_default(),
    };
    tracing::info!(
        sheet = %sheet.name,
        applied = summary.applied.len(),
        unmatched = summary.unmatched.len(),
        "applied statement import"
    );
    summary
}
