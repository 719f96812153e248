use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use dashboard_engine::{catalog, DashboardInput, FundsForm};
use models::{FinancialSnapshot, Profile, User};

use crate::{
    error::ApiError,
    repository::{BudgetRepository, Caller},
    state::AppState,
    Result,
};

/// The caller's session, resolved once per request from the bearer token.
/// Handlers receive it explicitly instead of looking the user up themselves.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_demo(&self) -> bool {
        self.user.is_none()
    }

    /// The signed-in user, or `Unauthorized` with the given message.
    pub fn require_user(&self, message: &str) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized(message.to_string()))
    }

    /// The signed-in user together with the token their data calls run under.
    pub fn caller(&self) -> Option<Caller<'_>> {
        match (&self.user, &self.access_token) {
            (Some(user), Some(token)) => Some(Caller {
                user_id: &user.id,
                access_token: token,
            }),
            _ => None,
        }
    }

    /// Like `require_user`, for calls that read or write the user's rows.
    pub fn require_caller(&self, message: &str) -> Result<Caller<'_>> {
        self.caller()
            .ok_or_else(|| ApiError::Unauthorized(message.to_string()))
    }

    /// Dashboard data with demo values substituted where nothing is stored.
    pub async fn dashboard_input(&self, repo: &dyn BudgetRepository) -> Result<DashboardInput> {
        let Some(caller) = self.caller() else {
            return Ok(DashboardInput {
                profile: Profile::demo(),
                snapshot: FinancialSnapshot::demo(),
                is_demo: true,
                streak_days: catalog::DEMO_STREAK_DAYS,
            });
        };

        let profile = repo
            .get_profile(caller)
            .await?
            .unwrap_or_else(|| Profile::placeholder(caller.user_id));
        let snapshot = repo
            .get_latest_financial_snapshot(caller)
            .await?
            .unwrap_or_else(FinancialSnapshot::demo);

        Ok(DashboardInput {
            profile,
            snapshot,
            is_demo: false,
            streak_days: catalog::DEMO_STREAK_DAYS,
        })
    }

    /// Funds form prefill: demo figures when signed out, blank when signed in
    /// with nothing saved yet.
    pub async fn funds_form(&self, repo: &dyn BudgetRepository) -> Result<FundsForm> {
        match self.caller() {
            None => Ok(FundsForm::from_snapshot(&FinancialSnapshot::demo())),
            Some(caller) => Ok(repo
                .get_latest_financial_snapshot(caller)
                .await?
                .map(|s| FundsForm::from_snapshot(&s))
                .unwrap_or_default()),
        }
    }

    /// Demo profile when signed out; `None` when the row is missing.
    pub async fn profile(&self, repo: &dyn BudgetRepository) -> Result<Option<Profile>> {
        match self.caller() {
            None => Ok(Some(Profile::demo())),
            Some(caller) => repo.get_profile(caller).await,
        }
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Session::anonymous());
        };
        let user = state.repo.get_current_user(&token).await?;
        if user.is_none() {
            tracing::debug!("Unknown or expired token, continuing as demo");
        }
        Ok(Session {
            user,
            access_token: Some(token),
        })
    }
}
