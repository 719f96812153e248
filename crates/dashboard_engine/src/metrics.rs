use models::{DerivedMetrics, FinancialSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::round1;

/// Computes expenses, available-to-save and savings rate for a snapshot.
///
/// Total over all inputs: zero income yields a 0% savings rate.
pub fn derive_metrics(snapshot: &FinancialSnapshot) -> DerivedMetrics {
    let monthly_expenses = snapshot.mandatory_expenses + snapshot.optional_expenses;
    let available_to_save = snapshot.monthly_income - monthly_expenses;
    DerivedMetrics {
        monthly_expenses,
        available_to_save,
        savings_rate_pct: savings_rate(available_to_save, snapshot.monthly_income),
    }
}

/// `available / income * 100`, or 0 when the ratio is undefined.
pub fn savings_rate(available_to_save: f64, monthly_income: f64) -> f64 {
    if monthly_income == 0.0 {
        return 0.0;
    }
    let rate = available_to_save / monthly_income * 100.0;
    if rate.is_finite() { rate } else { 0.0 }
}

/// Available-to-save as shown on summary cards: never below zero.
pub fn displayed_available(metrics: &DerivedMetrics) -> f64 {
    metrics.available_to_save.max(0.0)
}

/// Savings rate with one decimal, the precision used on every card.
pub fn display_rate(metrics: &DerivedMetrics) -> f64 {
    round1(metrics.savings_rate_pct)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("{0} must be a non-negative number")]
    InvalidAmount(&'static str),
}

/// Raw funds form as submitted; every amount is optional until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FundsForm {
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub mandatory_expenses: Option<f64>,
    #[serde(default)]
    pub optional_expenses: Option<f64>,
    #[serde(default)]
    pub savings_goal: Option<f64>,
}

impl FundsForm {
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            monthly_income: Some(snapshot.monthly_income),
            mandatory_expenses: Some(snapshot.mandatory_expenses),
            optional_expenses: Some(snapshot.optional_expenses),
            savings_goal: Some(snapshot.savings_goal),
        }
    }

    /// Income and both expense fields are required; the savings goal defaults to 0.
    pub fn validate(&self) -> Result<FinancialSnapshot, FormError> {
        let (Some(income), Some(mandatory), Some(optional)) = (
            self.monthly_income,
            self.mandatory_expenses,
            self.optional_expenses,
        ) else {
            return Err(FormError::MissingFields);
        };
        let goal = self.savings_goal.unwrap_or(0.0);

        for (label, value) in [
            ("Monthly income", income),
            ("Mandatory expenses", mandatory),
            ("Optional expenses", optional),
            ("Savings goal", goal),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FormError::InvalidAmount(label));
            }
        }

        Ok(FinancialSnapshot {
            monthly_income: income,
            mandatory_expenses: mandatory,
            optional_expenses: optional,
            savings_goal: goal,
        })
    }

    /// Live preview while the form is incomplete; blank fields count as 0.
    pub fn preview(&self) -> DerivedMetrics {
        derive_metrics(&FinancialSnapshot {
            monthly_income: self.monthly_income.unwrap_or(0.0),
            mandatory_expenses: self.mandatory_expenses.unwrap_or(0.0),
            optional_expenses: self.optional_expenses.unwrap_or(0.0),
            savings_goal: self.savings_goal.unwrap_or(0.0),
        })
    }
}
