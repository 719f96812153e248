use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{AuthSession, FinancialSnapshot, Profile, ProfileUpdate, User};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

/// The signed-in user a data call is made for. Rows are filtered by
/// `user_id`; the hosted store also authorises the call with `access_token`,
/// so its row-level policies see the user rather than the anonymous key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller<'a> {
    pub user_id: &'a str,
    pub access_token: &'a str,
}

/// Access to accounts, profiles and financial snapshots.
/// Implemented by the hosted store client and by an in-memory store for
/// development and tests.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<User>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;
    async fn sign_out(&self, access_token: &str) -> Result<()>;
    /// `None` for unknown or expired tokens; that is not an error.
    async fn get_current_user(&self, access_token: &str) -> Result<Option<User>>;
    /// Most recently created snapshot for the user.
    async fn get_latest_financial_snapshot(
        &self,
        caller: Caller<'_>,
    ) -> Result<Option<FinancialSnapshot>>;
    async fn get_profile(&self, caller: Caller<'_>) -> Result<Option<Profile>>;
    /// Always appends a new row; earlier snapshots are kept.
    async fn save_snapshot(&self, caller: Caller<'_>, snapshot: &FinancialSnapshot) -> Result<()>;
    async fn update_profile(&self, caller: Caller<'_>, update: &ProfileUpdate) -> Result<()>;
}

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: User,
    password_digest: String,
}

struct SnapshotRow {
    user_id: String,
    created_at: DateTime<Utc>,
    seq: u64,
    snapshot: FinancialSnapshot,
}

#[derive(Default)]
struct Store {
    // keyed by lowercased email
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    profiles: HashMap<String, Profile>,
    snapshots: Vec<SnapshotRow>,
    next_seq: u64,
}

impl Store {
    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Row-level rule: a token only reaches its own user's rows.
    fn owns(&self, caller: Caller<'_>) -> bool {
        self.tokens
            .get(caller.access_token)
            .is_some_and(|user_id| user_id == caller.user_id)
    }
}

/// Process-local store with the same observable behaviour as the hosted one.
#[derive(Default)]
pub struct InMemoryBudgetRepository {
    store: RwLock<Store>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshot rows ever saved for a user.
    pub async fn snapshot_count(&self, user_id: &str) -> usize {
        let store = self.store.read().await;
        store.snapshots.iter().filter(|r| r.user_id == user_id).count()
    }
}

fn digest(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<User> {
        let key = email.trim().to_lowercase();
        if key.is_empty() {
            return Err(ApiError::Remote("Email is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Remote(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut store = self.store.write().await;
        if store.accounts.contains_key(&key) {
            return Err(ApiError::Remote("User already registered".to_string()));
        }

        let seq = store.bump();
        let user = User {
            id: digest(&["user", &key, &seq.to_string()])[..32].to_string(),
            email: key.clone(),
        };
        store
            .profiles
            .insert(user.id.clone(), Profile::new_player(&user.id, username.trim()));
        store.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password_digest: digest(&[&user.id, password]),
            },
        );

        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let key = email.trim().to_lowercase();
        let mut store = self.store.write().await;

        let user = match store.accounts.get(&key) {
            Some(account) if account.password_digest == digest(&[&account.user.id, password]) => {
                account.user.clone()
            }
            _ => return Err(ApiError::Remote("Invalid login credentials".to_string())),
        };

        let seq = store.bump();
        let access_token = digest(&[
            "token",
            &user.id,
            &seq.to_string(),
            &Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string(),
        ]);
        store.tokens.insert(access_token.clone(), user.id.clone());

        Ok(AuthSession { access_token, user })
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.tokens.remove(access_token);
        Ok(())
    }

    async fn get_current_user(&self, access_token: &str) -> Result<Option<User>> {
        let store = self.store.read().await;
        let Some(user_id) = store.tokens.get(access_token) else {
            return Ok(None);
        };
        Ok(store
            .accounts
            .values()
            .find(|a| &a.user.id == user_id)
            .map(|a| a.user.clone()))
    }

    async fn get_latest_financial_snapshot(
        &self,
        caller: Caller<'_>,
    ) -> Result<Option<FinancialSnapshot>> {
        let store = self.store.read().await;
        if !store.owns(caller) {
            return Ok(None);
        }
        Ok(store
            .snapshots
            .iter()
            .filter(|r| r.user_id == caller.user_id)
            .max_by_key(|r| (r.created_at, r.seq))
            .map(|r| r.snapshot))
    }

    async fn get_profile(&self, caller: Caller<'_>) -> Result<Option<Profile>> {
        let store = self.store.read().await;
        if !store.owns(caller) {
            return Ok(None);
        }
        Ok(store.profiles.get(caller.user_id).cloned())
    }

    async fn save_snapshot(&self, caller: Caller<'_>, snapshot: &FinancialSnapshot) -> Result<()> {
        let mut store = self.store.write().await;
        if !store.owns(caller) {
            return Err(ApiError::Remote(
                "new row violates row-level security policy for table \"financial_data\"".to_string(),
            ));
        }
        let seq = store.bump();
        store.snapshots.push(SnapshotRow {
            user_id: caller.user_id.to_string(),
            created_at: Utc::now(),
            seq,
            snapshot: *snapshot,
        });
        Ok(())
    }

    async fn update_profile(&self, caller: Caller<'_>, update: &ProfileUpdate) -> Result<()> {
        let mut store = self.store.write().await;
        if !store.owns(caller) {
            // Hidden rows match nothing, as with the hosted store
            return Ok(());
        }
        if let Some(profile) = store.profiles.get_mut(caller.user_id) {
            profile.username = update.username.clone();
            profile.avatar_emoji = update.avatar_emoji.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(income: f64) -> FinancialSnapshot {
        FinancialSnapshot {
            monthly_income: income,
            mandatory_expenses: 100.0,
            optional_expenses: 50.0,
            savings_goal: 10.0,
        }
    }

    async fn signed_in(repo: &InMemoryBudgetRepository, email: &str) -> AuthSession {
        repo.sign_up(email, "secret1", "A").await.unwrap();
        repo.sign_in(email, "secret1").await.unwrap()
    }

    fn caller(session: &AuthSession) -> Caller<'_> {
        Caller {
            user_id: &session.user.id,
            access_token: &session.access_token,
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile() {
        let repo = InMemoryBudgetRepository::new();
        let user = repo.sign_up("Hero@Example.com", "secret1", "Hero").await.unwrap();
        assert_eq!(user.email, "hero@example.com");

        let session = repo.sign_in("hero@example.com", "secret1").await.unwrap();
        let profile = repo.get_profile(caller(&session)).await.unwrap().unwrap();
        assert_eq!(profile.username, "Hero");
        assert_eq!(profile.level, 1);
        assert_eq!(profile.avatar_emoji, "🎮");
    }

    #[tokio::test]
    async fn test_duplicate_and_short_password_rejected() {
        let repo = InMemoryBudgetRepository::new();
        repo.sign_up("a@b.c", "secret1", "A").await.unwrap();
        assert!(matches!(
            repo.sign_up("A@B.C", "secret1", "A").await,
            Err(ApiError::Remote(_))
        ));
        assert!(matches!(
            repo.sign_up("x@y.z", "123", "X").await,
            Err(ApiError::Remote(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let repo = InMemoryBudgetRepository::new();
        let user = repo.sign_up("a@b.c", "secret1", "A").await.unwrap();

        assert!(repo.sign_in("a@b.c", "wrong-pass").await.is_err());

        let session = repo.sign_in("a@b.c", "secret1").await.unwrap();
        let current = repo.get_current_user(&session.access_token).await.unwrap();
        assert_eq!(current, Some(user));

        repo.sign_out(&session.access_token).await.unwrap();
        assert_eq!(repo.get_current_user(&session.access_token).await.unwrap(), None);
        assert_eq!(repo.get_current_user("bogus").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshots_append_and_latest_wins() {
        let repo = InMemoryBudgetRepository::new();
        let ana = signed_in(&repo, "ana@example.com").await;
        let bo = signed_in(&repo, "bo@example.com").await;
        assert_eq!(repo.get_latest_financial_snapshot(caller(&ana)).await.unwrap(), None);

        repo.save_snapshot(caller(&ana), &snapshot(1000.0)).await.unwrap();
        repo.save_snapshot(caller(&ana), &snapshot(2000.0)).await.unwrap();
        repo.save_snapshot(caller(&bo), &snapshot(9000.0)).await.unwrap();

        let latest = repo.get_latest_financial_snapshot(caller(&ana)).await.unwrap().unwrap();
        assert_eq!(latest.monthly_income, 2000.0);
        assert_eq!(repo.snapshot_count(&ana.user.id).await, 2);
    }

    #[tokio::test]
    async fn test_rows_only_reachable_with_own_token() {
        let repo = InMemoryBudgetRepository::new();
        let ana = signed_in(&repo, "ana@example.com").await;
        let bo = signed_in(&repo, "bo@example.com").await;
        repo.save_snapshot(caller(&ana), &snapshot(1000.0)).await.unwrap();

        let borrowed = Caller {
            user_id: &ana.user.id,
            access_token: &bo.access_token,
        };
        assert_eq!(repo.get_latest_financial_snapshot(borrowed).await.unwrap(), None);
        assert_eq!(repo.get_profile(borrowed).await.unwrap(), None);
        assert!(matches!(
            repo.save_snapshot(borrowed, &snapshot(5.0)).await,
            Err(ApiError::Remote(_))
        ));
        assert_eq!(repo.snapshot_count(&ana.user.id).await, 1);

        repo.sign_out(&ana.access_token).await.unwrap();
        assert_eq!(repo.get_latest_financial_snapshot(caller(&ana)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = InMemoryBudgetRepository::new();
        let session = signed_in(&repo, "a@b.c").await;
        let update = ProfileUpdate {
            username: "Legend".to_string(),
            avatar_emoji: "🐉".to_string(),
        };
        repo.update_profile(caller(&session), &update).await.unwrap();

        let profile = repo.get_profile(caller(&session)).await.unwrap().unwrap();
        assert_eq!(profile.username, "Legend");
        assert_eq!(profile.avatar_emoji, "🐉");

        // No row: nothing to update, no error
        let missing = Caller {
            user_id: "missing",
            access_token: &session.access_token,
        };
        repo.update_profile(missing, &update).await.unwrap();
        assert_eq!(repo.get_profile(missing).await.unwrap(), None);
    }
}
