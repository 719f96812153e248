use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// Demo figures shown whenever no authenticated session exists
pub const DEMO_MONTHLY_INCOME: f64 = 50000.0;
pub const DEMO_MANDATORY_EXPENSES: f64 = 15000.0;
pub const DEMO_OPTIONAL_EXPENSES: f64 = 17000.0;
pub const DEMO_SAVINGS_GOAL: f64 = 20000.0;

pub const DEMO_PROFILE_ID: &str = "demo";
pub const DEMO_USERNAME: &str = "Demo User";
pub const DEMO_LEVEL: u32 = 5;
pub const DEMO_XP: u64 = 2500;
pub const DEMO_TOTAL_SAVED: f64 = 75000.0;

pub const DEFAULT_AVATAR_EMOJI: &str = "🎮";
pub const DEFAULT_USERNAME: &str = "Adventurer";

// Financial data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FinancialSnapshot {
	#[serde(deserialize_with = "null_as_default")]
	pub monthly_income: f64,
	#[serde(deserialize_with = "null_as_default")]
	pub mandatory_expenses: f64,
	#[serde(deserialize_with = "null_as_default")]
	pub optional_expenses: f64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub savings_goal: f64,
}

impl FinancialSnapshot {
	pub fn demo() -> Self {
		Self {
			monthly_income: DEMO_MONTHLY_INCOME,
			mandatory_expenses: DEMO_MANDATORY_EXPENSES,
			optional_expenses: DEMO_OPTIONAL_EXPENSES,
			savings_goal: DEMO_SAVINGS_GOAL,
		}
	}
}

/// Display metrics derived from a snapshot. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
	pub monthly_expenses: f64,
	pub available_to_save: f64,
	pub savings_rate_pct: f64,
}

// Accounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
	pub id: String,
	#[serde(default)]
	pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
	pub access_token: String,
	pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
	pub id: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub username: String,
	#[serde(default = "default_avatar", deserialize_with = "null_as_avatar")]
	pub avatar_emoji: String,
	#[serde(default = "default_level", deserialize_with = "null_as_level")]
	pub level: u32,
	#[serde(default, deserialize_with = "null_as_default")]
	pub xp: u64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub total_saved: f64,
}

fn default_avatar() -> String {
	DEFAULT_AVATAR_EMOJI.to_string()
}

// Profile and snapshot columns are nullable in the hosted store
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// Level 0 is not a real level either
fn null_as_level<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
	Ok(Option::<u32>::deserialize(d)?
		.filter(|level| *level > 0)
		.unwrap_or_else(default_level))
}

fn null_as_avatar<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(d)?
		.filter(|s| !s.is_empty())
		.unwrap_or_else(default_avatar))
}

fn default_level() -> u32 {
	1
}

impl Profile {
	pub fn demo() -> Self {
		Self {
			id: DEMO_PROFILE_ID.to_string(),
			username: DEMO_USERNAME.to_string(),
			avatar_emoji: DEFAULT_AVATAR_EMOJI.to_string(),
			level: DEMO_LEVEL,
			xp: DEMO_XP,
			total_saved: DEMO_TOTAL_SAVED,
		}
	}

	/// Stand-in for a signed-in user whose profile row is missing.
	pub fn placeholder(user_id: &str) -> Self {
		Self {
			id: user_id.to_string(),
			username: DEFAULT_USERNAME.to_string(),
			avatar_emoji: DEFAULT_AVATAR_EMOJI.to_string(),
			level: 1,
			xp: 0,
			total_saved: 0.0,
		}
	}

	/// Fresh profile row written at sign-up.
	pub fn new_player(user_id: &str, username: &str) -> Self {
		Self {
			username: username.to_string(),
			..Self::placeholder(user_id)
		}
	}

	pub fn display_name(&self) -> &str {
		if self.username.trim().is_empty() {
			DEFAULT_USERNAME
		} else {
			&self.username
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
	pub username: String,
	pub avatar_emoji: String,
}

// Gamification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameMood {
	Legendary,
	Excited,
	Happy,
	Neutral,
	Sad,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LevelProgress {
	pub level: u32,
	pub current_xp: u64,
	pub xp_for_next_level: u64,
	/// Raw ratio; may exceed 100 before a level-up is applied.
	pub progress_pct: f64,
	/// `progress_pct` clamped to [0, 100].
	pub display_pct: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameState {
	pub level: u32,
	pub total_xp: u64,
	pub current_xp: u64,
	pub streak_days: u32,
	pub savings_rate_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Badge {
	pub id: String,
	pub name: String,
	pub description: String,
	pub icon: String,
	pub earned: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
	Daily,
	Weekly,
	Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Challenge {
	pub id: String,
	pub name: String,
	pub description: String,
	pub kind: ChallengeKind,
	pub progress: f64,
	pub target: f64,
	pub reward_xp: u32,
	pub completed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GoalTerm {
	ShortTerm,
	LongTerm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
	pub id: String,
	pub name: String,
	pub current: f64,
	pub target: f64,
	pub term: GoalTerm,
	#[serde(default)]
	pub days_left: Option<u32>,
}

// Notifications and reminders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
	Reminder,
	Achievement,
	Warning,
	Motivational,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
	pub id: String,
	pub kind: NotificationKind,
	pub title: String,
	pub message: String,
	pub read: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
	Paid,
	Upcoming,
	Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillReminder {
	pub id: String,
	pub name: String,
	pub amount: f64,
	pub due_date: DateTime<Utc>,
	pub status: BillStatus,
}

// Expense tracking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
	Mandatory,
	Optional,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseFrequency {
	Monthly,
	Weekly,
	OneTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
	pub id: String,
	pub name: String,
	pub amount: f64,
	pub category: ExpenseCategory,
	pub frequency: ExpenseFrequency,
}

// Setup wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupGoalInput {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub amount: String,
	#[serde(default = "default_goal_term")]
	pub term: GoalTerm,
}

fn default_goal_term() -> GoalTerm {
	GoalTerm::ShortTerm
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupPlan {
	#[serde(default)]
	pub monthly_income: String,
	#[serde(default)]
	pub goals: Vec<SetupGoalInput>,
}

// Settings models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 3000,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreSettings {
	#[default]
	Memory,
	Supabase { url: String, api_key: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
	#[default]
	Pretty,
	Compact,
	Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
	pub filter: String,
	#[serde(default)]
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "backend_api=debug,tower_http=debug".to_string(),
			format: LogFormat::Pretty,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
	#[serde(default)]
	pub server: ServerSettings,
	#[serde(default)]
	pub store: StoreSettings,
	#[serde(default)]
	pub logging: LoggingSettings,
}
