//! Goal-box categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The savings goal a goal box ("caixinha") is earmarked for.
///
/// Serialized as its display label, which is also what clients submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    #[serde(rename = "Reserva de Emergência")]
    EmergencyFund,
    #[serde(rename = "Fazer uma viagem")]
    Travel,
    #[serde(rename = "Reformar a Casa")]
    HomeRenovation,
    #[serde(rename = "Focar na carreira")]
    Career,
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 4] = [
        GoalCategory::EmergencyFund,
        GoalCategory::Travel,
        GoalCategory::HomeRenovation,
        GoalCategory::Career,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GoalCategory::EmergencyFund => "Reserva de Emergência",
            GoalCategory::Travel => "Fazer uma viagem",
            GoalCategory::HomeRenovation => "Reformar a Casa",
            GoalCategory::Career => "Focar na carreira",
        }
    }

    /// Prefix of the account numbers generated for this category.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            GoalCategory::EmergencyFund => "EMERG",
            GoalCategory::Travel => "VIAGEM",
            GoalCategory::HomeRenovation => "CASA",
            GoalCategory::Career => "CARREIRA",
        }
    }

    /// Account number for the `sequence`-th box of this category, e.g. `VIAGEM-001`.
    pub fn account_number(&self, sequence: u32) -> String {
        format!("{}-{:03}", self.number_prefix(), sequence)
    }

    /// First generated number, counting up from 1, for which `is_taken` is false.
    pub fn next_free_number<F>(&self, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut sequence = 1;
        loop {
            let candidate = self.account_number(sequence);
            if !is_taken(&candidate) {
                return candidate;
            }
            sequence += 1;
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl FromStr for GoalCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ValidationError::UnknownGoalCategory(s.to_string()))
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
