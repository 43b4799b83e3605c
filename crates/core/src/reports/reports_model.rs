use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::accounts::{checked_total, AccountSummary, GoalBoxSummary};
use crate::errors::{Error, Result};

/// Snapshot of one user's holdings at report time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub holder_name: String,
    /// Wall-clock time in the report timezone.
    pub generated_at: NaiveDateTime,
    pub accounts: Vec<AccountSummary>,
    pub goal_boxes: Vec<GoalBoxSummary>,
}

impl ReportData {
    /// Sum of every account and goal-box balance.
    pub fn total_balance(&self) -> Result<Decimal> {
        let balances = self
            .accounts
            .iter()
            .map(|a| a.balance)
            .chain(self.goal_boxes.iter().map(|b| b.balance));
        Ok(checked_total(&self.holder_name, balances)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    /// Printable document; browsers save it as PDF.
    Html,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
        }
    }

    /// `relatorio_financeiro_2025-03-05.csv`
    pub fn filename(&self, generated_at: &NaiveDateTime) -> String {
        format!(
            "relatorio_financeiro_{}.{}",
            generated_at.format("%Y-%m-%d"),
            self.extension()
        )
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "html" | "pdf" => Ok(ReportFormat::Html),
            other => Err(Error::invalid_input(format!(
                "Unsupported report format '{other}'"
            ))),
        }
    }
}
