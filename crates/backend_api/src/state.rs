use chrono::Utc;
use dashboard_engine::{catalog, ledger::ExpenseLedger, notifications::NotificationFeed};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::repository::BudgetRepository;

/// Per-user working state that has no table behind it yet.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub notifications: NotificationFeed,
    pub expenses: ExpenseLedger,
}

impl Workspace {
    pub fn seeded() -> Self {
        Self {
            notifications: NotificationFeed::new(catalog::seeded_notifications(Utc::now())),
            expenses: ExpenseLedger::new(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BudgetRepository>,
    workspaces: Arc<RwLock<HashMap<String, Workspace>>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn BudgetRepository>) -> Self {
        Self {
            repo,
            workspaces: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Read a user's workspace, seeding it on first access.
    pub async fn with_workspace<T>(&self, user_id: &str, f: impl FnOnce(&mut Workspace) -> T) -> T {
        let mut workspaces = self.workspaces.write().await;
        let workspace = workspaces
            .entry(user_id.to_string())
            .or_insert_with(Workspace::seeded);
        f(workspace)
    }
}
