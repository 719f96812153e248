//! Fixed content shown until badges, challenges, goals and reminders are
//! backed by real tables.

use chrono::{DateTime, Duration, Utc};
use models::{
    Badge, BillReminder, BillStatus, Challenge, ChallengeKind, GameState, Goal, GoalTerm,
    Notification, NotificationKind,
};

/// State used by the progress page.
pub fn demo_game_state() -> GameState {
    GameState {
        level: 5,
        total_xp: 1250,
        current_xp: 45,
        streak_days: 7,
        savings_rate_pct: 28.0,
    }
}

/// Streak shown on the dashboard; activity days are not tracked yet.
pub const DEMO_STREAK_DAYS: u32 = 7;

pub fn badges() -> Vec<Badge> {
    [
        ("1", "First Saver", "Set your first financial goal", "🎯", true),
        ("2", "Income Tracker", "Enter your monthly income", "💰", true),
        ("3", "Expense Logger", "Log your first 10 expenses", "📝", true),
        ("4", "Budget Master", "Complete a budget challenge", "🏆", false),
        ("5", "Streak Master", "Maintain a 7-day savings streak", "🔥", false),
        ("6", "Goal Achiever", "Complete your first financial goal", "⭐", false),
        ("7", "Savings Champion", "Reach 10k in savings", "💎", false),
        ("8", "Master Planner", "Set 5 financial goals", "📊", false),
    ]
    .into_iter()
    .map(|(id, name, description, icon, earned)| Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        earned,
    })
    .collect()
}

pub fn challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "1".to_string(),
            name: "Daily Tracker".to_string(),
            description: "Log at least one expense".to_string(),
            kind: ChallengeKind::Daily,
            progress: 1.0,
            target: 1.0,
            reward_xp: 10,
            completed: true,
        },
        Challenge {
            id: "2".to_string(),
            name: "Weekly Saver".to_string(),
            description: "Save at least $200 this week".to_string(),
            kind: ChallengeKind::Weekly,
            progress: 150.0,
            target: 200.0,
            reward_xp: 50,
            completed: false,
        },
        Challenge {
            id: "3".to_string(),
            name: "Monthly Goal".to_string(),
            description: "Reach your monthly savings target".to_string(),
            kind: ChallengeKind::Monthly,
            progress: 2800.0,
            target: 3200.0,
            reward_xp: 100,
            completed: false,
        },
    ]
}

pub fn goals() -> Vec<Goal> {
    [
        ("1", "Emergency Fund", 80000.0, 100000.0, GoalTerm::ShortTerm, 90),
        ("2", "Vacation", 35000.0, 50000.0, GoalTerm::ShortTerm, 120),
        ("3", "House Down Payment", 250000.0, 500000.0, GoalTerm::LongTerm, 730),
    ]
    .into_iter()
    .map(|(id, name, current, target, term, days_left)| Goal {
        id: id.to_string(),
        name: name.to_string(),
        current,
        target,
        term,
        days_left: Some(days_left),
    })
    .collect()
}

/// Initial notification feed, timestamped relative to `now`.
pub fn seeded_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let item = |id: &str, kind, title: &str, message: &str, read, age: Duration| Notification {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        read,
        created_at: now - age,
    };

    vec![
        item(
            "1",
            NotificationKind::Achievement,
            "Badge Unlocked!",
            "You've earned the \"Expense Logger\" badge for tracking 10 expenses!",
            false,
            Duration::minutes(5),
        ),
        item(
            "2",
            NotificationKind::Reminder,
            "Upcoming Bill",
            "Your rent payment is due in 3 days. Set aside $1,500.",
            false,
            Duration::minutes(30),
        ),
        item(
            "3",
            NotificationKind::Motivational,
            "Great Progress!",
            "You've reached 28% savings rate this month. Keep it up!",
            true,
            Duration::hours(2),
        ),
        item(
            "4",
            NotificationKind::Warning,
            "Spending Alert",
            "Your optional spending is 15% higher than usual. Consider cutting back.",
            true,
            Duration::hours(24),
        ),
    ]
}

pub fn seeded_bills(now: DateTime<Utc>) -> Vec<BillReminder> {
    [
        ("1", "Rent", 1500.0, 3, BillStatus::Upcoming),
        ("2", "Internet", 60.0, 5, BillStatus::Upcoming),
        ("3", "Electricity", 120.0, -2, BillStatus::Overdue),
        ("4", "Phone Bill", 80.0, -10, BillStatus::Paid),
    ]
    .into_iter()
    .map(|(id, name, amount, days, status)| BillReminder {
        id: id.to_string(),
        name: name.to_string(),
        amount,
        due_date: now + Duration::days(days),
        status,
    })
    .collect()
}
