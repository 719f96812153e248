use anyhow::Result;
use clap::Parser;
use dashboard_engine::{DashboardInput, FundsForm, catalog, generate_dashboard};
use models::{FinancialSnapshot, Profile};

#[derive(Parser, Debug)]
#[command(
    name = "quest-report",
    about = "Print the dashboard a player would see for a month of numbers. Omitted values use the demo data."
)]
struct Args {
    /// Monthly income
    #[arg(long)]
    income: Option<f64>,

    /// Mandatory expenses (rent, utilities, ...)
    #[arg(long)]
    mandatory: Option<f64>,

    /// Optional expenses (dining out, entertainment, ...)
    #[arg(long)]
    optional: Option<f64>,

    /// Savings goal
    #[arg(long)]
    goal: Option<f64>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    level: Option<u32>,

    #[arg(long)]
    xp: Option<u64>,

    /// Streak length in days
    #[arg(long, default_value_t = catalog::DEMO_STREAK_DAYS)]
    streak: u32,

    /// Emit the full dashboard as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn snapshot_from(args: &Args) -> Result<FinancialSnapshot> {
    let demo = FinancialSnapshot::demo();
    let form = FundsForm {
        monthly_income: Some(args.income.unwrap_or(demo.monthly_income)),
        mandatory_expenses: Some(args.mandatory.unwrap_or(demo.mandatory_expenses)),
        optional_expenses: Some(args.optional.unwrap_or(demo.optional_expenses)),
        savings_goal: Some(args.goal.unwrap_or(demo.savings_goal)),
    };
    Ok(form.validate()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let snapshot = snapshot_from(&args)?;

    let mut profile = Profile::demo();
    if let Some(name) = &args.name {
        profile.username = name.clone();
    }
    profile.level = args.level.unwrap_or(profile.level);
    profile.xp = args.xp.unwrap_or(profile.xp);

    let is_demo = args.income.is_none()
        && args.mandatory.is_none()
        && args.optional.is_none()
        && args.goal.is_none();
    let dashboard = generate_dashboard(DashboardInput {
        profile,
        snapshot,
        is_demo,
        streak_days: args.streak,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Welcome back, {}! {}", dashboard.welcome_name, dashboard.avatar_emoji);
    if dashboard.is_demo {
        println!("(demo numbers)");
    }
    println!();
    println!("Monthly income:     {:>12.2}", dashboard.snapshot.monthly_income);
    println!("Mandatory expenses: {:>12.2}", dashboard.snapshot.mandatory_expenses);
    println!("Optional expenses:  {:>12.2}", dashboard.snapshot.optional_expenses);
    println!("Available to save:  {:>12.2}", dashboard.metrics.available_to_save);
    println!("Savings rate:       {:>11.1}%", dashboard.savings_rate_display);
    println!();
    println!(
        "{} {} ({})",
        dashboard.avatar.emoji, dashboard.avatar.message, dashboard.avatar.action
    );
    let progress = &dashboard.level.progress;
    println!(
        "Level {} {:?}: {}/{} XP ({:.0}%)",
        progress.level,
        dashboard.level.tier,
        progress.current_xp,
        progress.xp_for_next_level,
        progress.display_pct
    );
    if dashboard.streak.visible {
        let flame = if dashboard.streak.hot { " 🔥" } else { "" };
        println!("Streak: {} days{}", dashboard.streak.days, flame);
    }
    println!(
        "Badges: {}/{} earned",
        dashboard.badges.earned, dashboard.badges.total
    );

    Ok(())
}
