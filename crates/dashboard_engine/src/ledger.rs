use models::{Expense, ExpenseCategory, ExpenseFrequency};
use serde::{Deserialize, Serialize};

use crate::metrics::FormError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExpense {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    pub category: ExpenseCategory,
    pub frequency: ExpenseFrequency,
}

/// Running list of expenses entered during a session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseLedger {
    expenses: Vec<Expense>,
    #[serde(skip)]
    next_id: u64,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and amount are required; returns the stored entry.
    pub fn add(&mut self, input: NewExpense) -> Result<&Expense, FormError> {
        let name = input.name.trim();
        let amount = match input.amount {
            Some(amount) if !name.is_empty() => amount,
            _ => return Err(FormError::MissingFields),
        };
        if !amount.is_finite() || amount < 0.0 {
            return Err(FormError::InvalidAmount("Amount"));
        }

        self.next_id += 1;
        self.expenses.push(Expense {
            id: self.next_id.to_string(),
            name: name.to_string(),
            amount,
            category: input.category,
            frequency: input.frequency,
        });
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn total_for(&self, category: ExpenseCategory) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.amount)
            .sum()
    }

    pub fn mandatory_total(&self) -> f64 {
        self.total_for(ExpenseCategory::Mandatory)
    }

    pub fn optional_total(&self) -> f64 {
        self.total_for(ExpenseCategory::Optional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, amount: Option<f64>, category: ExpenseCategory) -> NewExpense {
        NewExpense {
            name: name.to_string(),
            amount,
            category,
            frequency: ExpenseFrequency::Monthly,
        }
    }

    #[test]
    fn test_totals_by_category() {
        let mut ledger = ExpenseLedger::new();
        ledger.add(entry("Rent", Some(15000.0), ExpenseCategory::Mandatory)).unwrap();
        ledger.add(entry("Food", Some(6000.0), ExpenseCategory::Mandatory)).unwrap();
        ledger.add(entry("Cinema", Some(2500.0), ExpenseCategory::Optional)).unwrap();

        assert_eq!(ledger.mandatory_total(), 21000.0);
        assert_eq!(ledger.optional_total(), 2500.0);
    }

    #[test]
    fn test_add_requires_name_and_amount() {
        let mut ledger = ExpenseLedger::new();
        assert_eq!(
            ledger.add(entry("", Some(10.0), ExpenseCategory::Optional)).unwrap_err(),
            FormError::MissingFields
        );
        assert_eq!(
            ledger.add(entry("Gym", None, ExpenseCategory::Optional)).unwrap_err(),
            FormError::MissingFields
        );
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let mut ledger = ExpenseLedger::new();
        let id = ledger
            .add(entry("Rent", Some(100.0), ExpenseCategory::Mandatory))
            .unwrap()
            .id
            .clone();
        ledger.add(entry("Snacks", Some(5.0), ExpenseCategory::Optional)).unwrap();

        let removed = ledger.remove(&id).unwrap();
        assert_eq!(removed.name, "Rent");
        assert!(ledger.remove(&id).is_none());
        assert_eq!(ledger.mandatory_total(), 0.0);
        assert_eq!(ledger.optional_total(), 5.0);
    }
}
