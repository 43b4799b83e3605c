use std::str::FromStr;

use caixinha_core::accounts::{AccountSummary, GoalBoxSummary};
use caixinha_core::goals::GoalCategory;
use caixinha_core::users::User;
use caixinha_core::{Error as CoreError, Result as CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoalBox {
    pub goal_type: String,
}

impl NewGoalBox {
    pub fn category(&self) -> CoreResult<GoalCategory> {
        parse_goal_category(&self.goal_type)
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalCategoryInfo {
    pub label: &'static str,
    pub prefix: &'static str,
}

impl From<GoalCategory> for GoalCategoryInfo {
    fn from(category: GoalCategory) -> Self {
        Self {
            label: category.label(),
            prefix: category.number_prefix(),
        }
    }
}

/// Everything the dashboard shows for the logged-in user.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user: User,
    pub accounts: Vec<AccountSummary>,
    pub goal_boxes: Vec<GoalBoxSummary>,
    pub total_balance: Decimal,
    pub withdrawal_limit: Decimal,
}

/// Outcome of a dashboard form post.
#[derive(Serialize, Debug, Clone)]
pub struct FormOutcome {
    pub success: bool,
    pub message: String,
}

impl FormOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Parses an amount typed into a form; `1.234,56` and `1234.56` both work.
pub fn parse_amount(raw: &str) -> CoreResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_input("Amount is required"));
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized)
        .map_err(|_| CoreError::invalid_input(format!("'{trimmed}' is not a valid amount")))
}

pub fn parse_goal_category(raw: &str) -> CoreResult<GoalCategory> {
    if raw.trim().is_empty() {
        return Err(CoreError::invalid_input("Select a goal box type"));
    }
    GoalCategory::from_str(raw).map_err(CoreError::from)
}
