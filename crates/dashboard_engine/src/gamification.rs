use models::{Badge, Challenge, GameMood, Goal, LevelProgress};
use serde::Serialize;

/// Maps a savings rate to a mood. Bands are checked high to low and the
/// first strict `>` match wins, so a boundary value falls to the lower band.
pub fn mood_for(savings_rate_pct: f64) -> GameMood {
    if savings_rate_pct > 40.0 {
        GameMood::Legendary
    } else if savings_rate_pct > 30.0 {
        GameMood::Excited
    } else if savings_rate_pct > 20.0 {
        GameMood::Happy
    } else if savings_rate_pct > 10.0 {
        GameMood::Neutral
    } else {
        GameMood::Sad
    }
}

pub fn mood_emoji(mood: GameMood) -> &'static str {
    match mood {
        GameMood::Legendary => "👑",
        GameMood::Excited => "🤩",
        GameMood::Happy => "😊",
        GameMood::Neutral => "😐",
        GameMood::Sad => "😢",
    }
}

/// Guardian avatar card content for a savings rate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvatarState {
    pub mood: GameMood,
    pub emoji: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

impl AvatarState {
    pub fn for_rate(savings_rate_pct: f64) -> Self {
        let mood = mood_for(savings_rate_pct);
        let (message, action) = match mood {
            GameMood::Legendary => (
                "LEGENDARY STATUS UNLOCKED!",
                "🔥 You're a financial warrior!",
            ),
            GameMood::Excited => ("Amazing savings rate!", "💪 Keep crushing your goals!"),
            GameMood::Happy => ("Great job saving!", "✨ You're doing awesome!"),
            GameMood::Neutral => ("Keep tracking to improve.", "📈 Every bit helps!"),
            GameMood::Sad => ("Let's boost those savings!", "💡 You can do this!"),
        };
        Self {
            mood,
            emoji: mood_emoji(mood),
            message,
            action,
        }
    }
}

/// Streak flame shown under the avatar.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StreakBadge {
    pub days: u32,
    pub visible: bool,
    /// More than a week in a row.
    pub hot: bool,
}

impl StreakBadge {
    pub fn new(days: u32) -> Self {
        Self {
            days,
            visible: days > 0,
            hot: days > 7,
        }
    }
}

pub fn xp_for_next_level(level: u32) -> u64 {
    u64::from(level) * 100 + 100
}

/// Progress towards the next level. Level-up itself is never applied here,
/// so `progress_pct` can run past 100 while `display_pct` stays clamped.
pub fn level_progress(level: u32, current_xp: u64) -> LevelProgress {
    let needed = xp_for_next_level(level);
    let progress_pct = current_xp as f64 / needed as f64 * 100.0;
    LevelProgress {
        level,
        current_xp,
        xp_for_next_level: needed,
        progress_pct,
        display_pct: progress_pct.clamp(0.0, 100.0),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LevelTier {
    Novice,
    Expert,
    Master,
    Legendary,
}

pub fn level_tier(level: u32) -> LevelTier {
    match level {
        15.. => LevelTier::Legendary,
        10..=14 => LevelTier::Master,
        5..=9 => LevelTier::Expert,
        _ => LevelTier::Novice,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct XpReward {
    pub activity: &'static str,
    pub xp: u32,
}

/// Displayed on the level card; rewards are not credited automatically.
pub const XP_REWARDS: [XpReward; 4] = [
    XpReward { activity: "Logging expenses", xp: 10 },
    XpReward { activity: "Daily challenges", xp: 25 },
    XpReward { activity: "Goal milestones", xp: 50 },
    XpReward { activity: "Achievements", xp: 100 },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LevelCard {
    pub progress: LevelProgress,
    pub tier: LevelTier,
    pub next_level: u32,
    pub rewards: &'static [XpReward],
}

impl LevelCard {
    pub fn new(level: u32, current_xp: u64) -> Self {
        Self {
            progress: level_progress(level, current_xp),
            tier: level_tier(level),
            next_level: level.saturating_add(1),
            rewards: &XP_REWARDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BadgeSummary {
    pub earned: usize,
    pub total: usize,
    pub badges: Vec<Badge>,
}

impl BadgeSummary {
    pub fn new(badges: Vec<Badge>) -> Self {
        Self {
            earned: badges.iter().filter(|b| b.earned).count(),
            total: badges.len(),
            badges,
        }
    }
}

/// Completed challenges read as 100 regardless of their counters.
pub fn challenge_progress_pct(challenge: &Challenge) -> f64 {
    if challenge.completed {
        return 100.0;
    }
    percent_of(challenge.progress, challenge.target).clamp(0.0, 100.0)
}

pub fn goal_progress_pct(goal: &Goal) -> f64 {
    percent_of(goal.current, goal.target)
}

fn percent_of(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    current / target * 100.0
}
