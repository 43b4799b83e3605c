//! On-disk model for accounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use caixinha_core::accounts::{account_types, Account, AccountKind};
use caixinha_core::constants::DEFAULT_INTEREST_RATE;
use caixinha_core::goals::GoalCategory;

use crate::errors::StorageError;

/// One entry of `contas.json`, keyed by account number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub titular: String,
    pub saldo: Decimal,
    pub tipo: String,
    #[serde(default)]
    pub tipo_caixinha: Option<String>,
    #[serde(default)]
    pub e_caixinha: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxa_rendimento: Option<Decimal>,
}

impl AccountRecord {
    pub fn to_domain(&self, account_number: &str) -> Result<Account, StorageError> {
        let invalid = |reason: String| StorageError::InvalidRecord {
            key: account_number.to_string(),
            reason,
        };
        let rate = self.taxa_rendimento.unwrap_or(DEFAULT_INTEREST_RATE);

        let kind = if self.e_caixinha {
            let label = self
                .tipo_caixinha
                .as_deref()
                .ok_or_else(|| invalid("goal box without tipo_caixinha".to_string()))?;
            let category = GoalCategory::from_label(label)
                .ok_or_else(|| invalid(format!("unknown goal category '{label}'")))?;
            AccountKind::GoalBox {
                category,
                interest_rate: rate,
            }
        } else {
            match self.tipo.as_str() {
                account_types::SAVINGS => AccountKind::Savings {
                    interest_rate: rate,
                },
                account_types::CHECKING => AccountKind::Checking,
                other => return Err(invalid(format!("unknown account type '{other}'"))),
            }
        };

        Account::restore(account_number, self.titular.clone(), self.saldo, kind)
            .map_err(|e| invalid(e.to_string()))
    }

    pub fn from_domain(account: &Account) -> Self {
        Self {
            titular: account.owner.clone(),
            saldo: account.balance(),
            tipo: account.kind.type_tag().to_string(),
            tipo_caixinha: account.goal_label().map(str::to_string),
            e_caixinha: account.is_goal_box(),
            taxa_rendimento: account.kind.interest_rate(),
        }
    }

    /// True when this record is `owner`'s goal box of `category`.
    pub fn is_goal_box_of(&self, owner: &str, category: GoalCategory) -> bool {
        self.e_caixinha
            && self.titular == owner
            && self.tipo_caixinha.as_deref() == Some(category.label())
    }
}
