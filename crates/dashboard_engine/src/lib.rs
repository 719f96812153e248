//! Budget quest computations: derived metrics, gamification state and the
//! per-page view models assembled from them. Everything here is pure; data
//! access lives in `backend_api`.

pub mod catalog;
pub mod gamification;
pub mod ledger;
pub mod metrics;
pub mod notifications;
pub mod setup;

use models::{Challenge, DerivedMetrics, FinancialSnapshot, GameState, Goal, Profile};
use serde::Serialize;

pub use gamification::{
    level_progress, level_tier, mood_for, AvatarState, BadgeSummary, LevelCard, LevelTier,
    StreakBadge,
};
pub use metrics::{derive_metrics, FormError, FundsForm};

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_pct: f64,
}

fn challenge_views() -> Vec<ChallengeView> {
    catalog::challenges()
        .into_iter()
        .map(|challenge| ChallengeView {
            progress_pct: round2(gamification::challenge_progress_pct(&challenge)),
            challenge,
        })
        .collect()
}

fn goal_views() -> Vec<GoalView> {
    catalog::goals()
        .into_iter()
        .map(|goal| GoalView {
            progress_pct: round2(gamification::goal_progress_pct(&goal)),
            goal,
        })
        .collect()
}

/// Everything the dashboard needs, already resolved (demo fallback applied).
#[derive(Debug, Clone)]
pub struct DashboardInput {
    pub profile: Profile,
    pub snapshot: FinancialSnapshot,
    pub is_demo: bool,
    pub streak_days: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOutput {
    pub is_demo: bool,
    pub welcome_name: String,
    pub avatar_emoji: String,
    pub total_saved: f64,
    pub snapshot: FinancialSnapshot,
    pub metrics: DerivedMetrics,
    pub savings_rate_display: f64,
    pub avatar: AvatarState,
    pub streak: StreakBadge,
    pub level: LevelCard,
    pub badges: BadgeSummary,
    pub challenges: Vec<ChallengeView>,
    pub goals: Vec<GoalView>,
}

pub fn generate_dashboard(input: DashboardInput) -> DashboardOutput {
    let metrics = derive_metrics(&input.snapshot);
    // The guardian reacts to the rate as displayed, one decimal
    let savings_rate_display = metrics::display_rate(&metrics);

    DashboardOutput {
        is_demo: input.is_demo,
        welcome_name: input.profile.display_name().to_string(),
        avatar_emoji: input.profile.avatar_emoji.clone(),
        total_saved: input.profile.total_saved,
        snapshot: input.snapshot,
        metrics,
        savings_rate_display,
        avatar: AvatarState::for_rate(savings_rate_display),
        streak: StreakBadge::new(input.streak_days),
        level: LevelCard::new(input.profile.level, input.profile.xp),
        badges: BadgeSummary::new(catalog::badges()),
        challenges: challenge_views(),
        goals: goal_views(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FundsOutput {
    pub is_demo: bool,
    pub form: FundsForm,
    pub metrics: DerivedMetrics,
    pub available_display: f64,
    pub savings_rate_display: f64,
}

/// Funds editor state; `form` is empty for a signed-in user without data.
pub fn funds_view(form: FundsForm, is_demo: bool) -> FundsOutput {
    let metrics = form.preview();
    FundsOutput {
        is_demo,
        available_display: metrics::displayed_available(&metrics),
        savings_rate_display: metrics::display_rate(&metrics),
        metrics,
        form,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GamificationOutput {
    pub state: GameState,
    pub avatar: AvatarState,
    pub streak: StreakBadge,
    pub level: LevelCard,
    pub badges: BadgeSummary,
    pub challenges: Vec<ChallengeView>,
}

pub fn gamification_view(state: GameState) -> GamificationOutput {
    GamificationOutput {
        avatar: AvatarState::for_rate(state.savings_rate_pct),
        streak: StreakBadge::new(state.streak_days),
        level: LevelCard::new(state.level, state.current_xp),
        badges: BadgeSummary::new(catalog::badges()),
        challenges: challenge_views(),
        state,
    }
}
