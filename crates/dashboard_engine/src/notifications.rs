use chrono::{DateTime, Utc};
use models::{BillReminder, BillStatus, Notification};
use serde::Serialize;

/// Relative age label: "just now", "12m ago", "3h ago", "2d ago".
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{days}d ago")
    }
}

/// One user's notification list, newest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(mut items: Vec<Notification>) -> Self {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { items }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Returns false when no notification has that id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    /// Returns false when no notification has that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn view(&self, now: DateTime<Utc>) -> NotificationsOutput {
        let unread = self.unread_count();
        NotificationsOutput {
            unread,
            summary: format!(
                "{unread} new notification{}",
                if unread == 1 { "" } else { "s" }
            ),
            items: self
                .items
                .iter()
                .map(|n| NotificationView {
                    time_ago: time_ago(n.created_at, now),
                    notification: n.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub time_ago: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsOutput {
    pub unread: usize,
    pub summary: String,
    pub items: Vec<NotificationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillSummary {
    pub upcoming_count: usize,
    pub upcoming_total: f64,
    pub bills: Vec<BillReminder>,
}

impl BillSummary {
    pub fn new(bills: Vec<BillReminder>) -> Self {
        let upcoming = bills.iter().filter(|b| b.status == BillStatus::Upcoming);
        Self {
            upcoming_count: upcoming.clone().count(),
            upcoming_total: upcoming.map(|b| b.amount).sum(),
            bills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use chrono::Duration;

    #[test]
    fn test_time_ago_labels() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(time_ago(now - Duration::hours(2), now), "2h ago");
        assert_eq!(time_ago(now - Duration::hours(24), now), "1d ago");
        assert_eq!(time_ago(now - Duration::days(9), now), "9d ago");
    }

    #[test]
    fn test_feed_mark_read_and_remove() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new(catalog::seeded_notifications(now));
        assert_eq!(feed.unread_count(), 2);

        assert!(feed.mark_read("1"));
        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.mark_read("missing"));

        assert!(feed.remove("2"));
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.items().len(), 3);
        assert!(!feed.remove("2"));

        let view = feed.view(now);
        assert_eq!(view.summary, "0 new notifications");
        assert_eq!(view.items[0].time_ago, "5m ago");
    }

    #[test]
    fn test_summary_singular() {
        let now = Utc::now();
        let mut feed = NotificationFeed::new(catalog::seeded_notifications(now));
        feed.mark_read("2");
        assert_eq!(feed.view(now).summary, "1 new notification");
    }

    #[test]
    fn test_bill_summary() {
        let summary = BillSummary::new(catalog::seeded_bills(Utc::now()));
        assert_eq!(summary.upcoming_count, 2);
        assert_eq!(summary.upcoming_total, 1560.0);
    }
}
