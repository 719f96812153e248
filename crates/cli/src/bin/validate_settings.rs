use anyhow::{Result, anyhow};
use clap::Parser;
use models::{Settings, StoreSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "validate-settings",
    about = "Check a settings file (plus environment overrides) before starting the server."
)]
struct Args {
    /// Settings file; defaults to BUDGET_SETTINGS, then settings.json
    path: Option<PathBuf>,

    /// Ignore HOST, PORT, SUPABASE_* and LOG_* from the environment
    #[arg(long)]
    no_env: bool,
}

#[derive(Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Report {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
    fn print(&self) {
        for w in &self.warnings {
            println!("[WARN] {}", w);
        }
        for e in &self.errors {
            println!("[ERROR] {}", e);
        }
    }
    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn load(args: &Args) -> Result<Settings> {
    if args.no_env {
        let settings = settings_loader::load_settings_with_fallback(args.path.as_ref())?
            .unwrap_or_default();
        settings_loader::validate(&settings)?;
        Ok(settings)
    } else {
        settings_loader::load_effective_settings(args.path.clone())
    }
}

fn review(settings: &Settings) -> Report {
    let mut rep = Report::default();

    if settings.server.port == 0 {
        rep.warn("server.port is 0; the OS will pick a random port");
    }
    match &settings.store {
        StoreSettings::Memory => {
            rep.warn("store is in-memory; accounts and funds are lost on restart")
        }
        StoreSettings::Supabase { url, .. } => {
            let local = url.contains("localhost") || url.contains("127.0.0.1");
            if url.starts_with("http://") && !local {
                rep.warn(format!("Supabase url '{}' is not https", url));
            }
        }
    }
    if settings.logging.filter.trim().is_empty() {
        rep.error("logging.filter must not be empty");
    }

    rep
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load(&args)?;

    let report = review(&settings);
    report.print();

    if report.has_errors() {
        return Err(anyhow!("Validation failed"));
    }

    println!(
        "Settings OK: {}:{} with {} store, log format {:?}",
        settings.server.host,
        settings.server.port,
        match settings.store {
            StoreSettings::Memory => "memory",
            StoreSettings::Supabase { .. } => "supabase",
        },
        settings.logging.format
    );
    Ok(())
}
