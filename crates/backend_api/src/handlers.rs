use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use dashboard_engine::{
    catalog, funds_view, gamification_view, generate_dashboard, ledger::NewExpense,
    notifications::BillSummary, setup::summarize_setup, FundsForm,
};
use models::{ProfileUpdate, SetupPlan};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::ApiError, session::Session, state::AppState, Result};

const LOGIN_TO_SAVE_FUNDS: &str = "Please log in to save your funds";
const LOGIN_TO_EDIT_PROFILE: &str = "Please log in to update your profile";
const LOGIN_TO_MANAGE: &str = "Please log in to manage your quest log";
const MAX_AVATAR_CHARS: usize = 2;

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "budget-quest-api"
    }))
}

/// GET /api/home
/// Landing page: whether the visitor is signed in, plus the feature list
pub async fn home(session: Session) -> impl IntoResponse {
    Json(json!({
        "signed_in": session.user.is_some(),
        "features": [
            { "title": "Smart Tracking", "description": "Log mandatory and optional expenses as you go" },
            { "title": "Goal Setting", "description": "Plan short-term and long-term savings goals" },
            { "title": "Gamification", "description": "Earn XP, badges and streaks for good habits" },
            { "title": "Smart Insights", "description": "See where your money goes every month" },
        ],
    }))
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/sign-up
/// Registers, then signs straight in so the client lands on the dashboard
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse> {
    if request.email.trim().is_empty()
        || request.password.is_empty()
        || request.username.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Username, email and password are required".to_string(),
        ));
    }

    let user = state
        .repo
        .sign_up(&request.email, &request.password, request.username.trim())
        .await?;
    tracing::info!(user_id = %user.id, "Signed up");

    match state.repo.sign_in(&request.email, &request.password).await {
        Ok(session) => Ok((StatusCode::CREATED, Json(serde_json::to_value(session)?))),
        // Projects with email confirmation refuse the immediate sign-in
        Err(ApiError::Remote(message)) if message.contains("not confirmed") => Ok((
            StatusCode::ACCEPTED,
            Json(json!({ "user": user, "next": "/auth/check-email" })),
        )),
        Err(err) => Err(err),
    }
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse> {
    let session = state.repo.sign_in(&request.email, &request.password).await?;
    Ok(Json(session))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    // A stale token is already signed out; the auth service would reject it
    if let Some(caller) = session.caller() {
        state.repo.sign_out(caller.access_token).await?;
        tracing::info!(user_id = %caller.user_id, "Signed out");
    }
    Ok(Json(json!({ "status": "signed_out" })))
}

/// GET /api/auth/user
pub async fn current_user(session: Session) -> impl IntoResponse {
    Json(json!({ "user": session.user }))
}

/// GET /api/auth/check-email
pub async fn check_email() -> impl IntoResponse {
    Json(json!({
        "title": "Check your email",
        "message": "We've sent you a confirmation link. Confirm your address, then log in to start your quest.",
    }))
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let input = session.dashboard_input(state.repo.as_ref()).await?;
    let now = Utc::now();

    let mut dashboard = serde_json::to_value(generate_dashboard(input))?;
    dashboard["bills"] = serde_json::to_value(BillSummary::new(catalog::seeded_bills(now)))?;

    Ok(Json(dashboard))
}

/// GET /api/funds
pub async fn get_funds(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let form = session.funds_form(state.repo.as_ref()).await?;
    Ok(Json(funds_view(form, session.is_demo())))
}

/// POST /api/funds
/// Validates, then appends a new snapshot row for the signed-in user
pub async fn save_funds(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<FundsForm>,
) -> Result<impl IntoResponse> {
    let snapshot = form.validate()?;
    let caller = session.require_caller(LOGIN_TO_SAVE_FUNDS)?;

    state
        .repo
        .save_snapshot(caller, &snapshot)
        .await
        .map_err(|e| e.while_doing("Error saving funds"))?;
    tracing::info!(user_id = %caller.user_id, "Saved funds");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "✅ Funds updated successfully!",
            "funds": funds_view(FundsForm::from_snapshot(&snapshot), false),
        })),
    ))
}

/// GET /api/gamification
pub async fn get_gamification() -> impl IntoResponse {
    Json(gamification_view(catalog::demo_game_state()))
}

/// GET /api/notifications
/// Signed-out visitors see a freshly seeded feed
pub async fn list_notifications(
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let now = Utc::now();
    let view = match &session.user {
        Some(user) => {
            state
                .with_workspace(&user.id, |w| w.notifications.view(now))
                .await
        }
        None => crate::state::Workspace::seeded().notifications.view(now),
    };
    Json(view)
}

/// POST /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = session.require_user(LOGIN_TO_MANAGE)?;
    let found = state
        .with_workspace(&user.id, |w| w.notifications.mark_read(&id))
        .await;
    if !found {
        return Err(ApiError::NotFound(format!("Notification {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = session.require_user(LOGIN_TO_MANAGE)?;
    let found = state
        .with_workspace(&user.id, |w| w.notifications.remove(&id))
        .await;
    if !found {
        return Err(ApiError::NotFound(format!("Notification {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    pub expenses: Vec<models::Expense>,
    pub mandatory_total: f64,
    pub optional_total: f64,
}

fn expenses_response(ledger: &dashboard_engine::ledger::ExpenseLedger) -> ExpensesResponse {
    ExpensesResponse {
        expenses: ledger.expenses().to_vec(),
        mandatory_total: ledger.mandatory_total(),
        optional_total: ledger.optional_total(),
    }
}

/// GET /api/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let user = session.require_user(LOGIN_TO_MANAGE)?;
    let response = state
        .with_workspace(&user.id, |w| expenses_response(&w.expenses))
        .await;
    Ok(Json(response))
}

/// POST /api/expenses
pub async fn add_expense(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<NewExpense>,
) -> Result<impl IntoResponse> {
    let user = session.require_user(LOGIN_TO_MANAGE)?;
    let response = state
        .with_workspace(&user.id, |w| {
            w.expenses.add(input)?;
            Ok::<_, ApiError>(expenses_response(&w.expenses))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/expenses/:id
pub async fn remove_expense(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = session.require_user(LOGIN_TO_MANAGE)?;
    let response = state
        .with_workspace(&user.id, |w| {
            w.expenses
                .remove(&id)
                .map(|_| expenses_response(&w.expenses))
        })
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Expense {id}")))?;
    Ok(Json(response))
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let profile = session.profile(state.repo.as_ref()).await?;
    Ok(Json(json!({
        "is_demo": session.is_demo(),
        "profile": profile,
    })))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    let caller = session.require_caller(LOGIN_TO_EDIT_PROFILE)?;
    let update = ProfileUpdate {
        username: update.username.trim().to_string(),
        avatar_emoji: update.avatar_emoji.trim().to_string(),
    };
    let avatar_len = update.avatar_emoji.chars().count();
    if avatar_len == 0 || avatar_len > MAX_AVATAR_CHARS {
        return Err(ApiError::Validation(
            "Avatar must be one or two characters".to_string(),
        ));
    }

    state
        .repo
        .update_profile(caller, &update)
        .await
        .map_err(|e| e.while_doing("Error updating profile"))?;
    let profile = state.repo.get_profile(caller).await?;

    Ok(Json(json!({
        "is_demo": false,
        "profile": profile,
    })))
}

/// POST /api/setup
/// Summary shown on the last step of the setup wizard
pub async fn setup(Json(plan): Json<SetupPlan>) -> impl IntoResponse {
    Json(summarize_setup(&plan))
}
