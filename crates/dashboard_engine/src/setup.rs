use models::{GoalTerm, SetupPlan};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlannedGoal {
    pub name: String,
    pub amount: f64,
    pub term: GoalTerm,
}

/// Final step of the setup wizard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetupSummary {
    pub monthly_income: f64,
    pub goal_count: usize,
    pub goals: Vec<PlannedGoal>,
    pub total_goal_amount: f64,
}

/// Unnamed goal rows are dropped; blank or unparsable amounts read as 0.
pub fn summarize_setup(plan: &SetupPlan) -> SetupSummary {
    let goals: Vec<PlannedGoal> = plan
        .goals
        .iter()
        .filter(|g| !g.name.trim().is_empty())
        .map(|g| PlannedGoal {
            name: g.name.trim().to_string(),
            amount: parse_amount(&g.amount),
            term: g.term,
        })
        .collect();

    SetupSummary {
        monthly_income: parse_amount(&plan.monthly_income),
        goal_count: goals.len(),
        total_goal_amount: goals.iter().map(|g| g.amount).sum(),
        goals,
    }
}

fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::SetupGoalInput;

    fn goal(name: &str, amount: &str, term: GoalTerm) -> SetupGoalInput {
        SetupGoalInput {
            name: name.to_string(),
            amount: amount.to_string(),
            term,
        }
    }

    #[test]
    fn test_summary_skips_unnamed_goals() {
        let plan = SetupPlan {
            monthly_income: "50000".to_string(),
            goals: vec![
                goal("Vacation", "50000", GoalTerm::ShortTerm),
                goal("", "999", GoalTerm::ShortTerm),
                goal("House", "", GoalTerm::LongTerm),
            ],
        };

        let summary = summarize_setup(&plan);
        assert_eq!(summary.monthly_income, 50000.0);
        assert_eq!(summary.goal_count, 2);
        assert_eq!(summary.goals[1].amount, 0.0);
        assert_eq!(summary.goals[1].term, GoalTerm::LongTerm);
        assert_eq!(summary.total_goal_amount, 50000.0);
    }

    #[test]
    fn test_unparsable_income_reads_as_zero() {
        let plan = SetupPlan {
            monthly_income: "lots".to_string(),
            goals: vec![],
        };
        assert_eq!(summarize_setup(&plan).monthly_income, 0.0);
    }
}
