//! # Settings Loader
//!
//! Centralised settings loading for the budget quest server and tools.
//! Settings come from a JSON file (`settings.json` by default, or the path in
//! `BUDGET_SETTINGS`) and are then overridden by environment variables, after
//! a `.env` file has been loaded when present.
//!
//! ## Features
//!
//! - Load settings from specified file paths
//! - Load settings from default location (`settings.json`)
//! - Fall back to built-in defaults (in-memory store) when no file exists
//! - Environment overrides: `HOST`, `PORT`, `SUPABASE_URL`, `SUPABASE_ANON_KEY`,
//!   `LOG_FILTER`, `LOG_FORMAT`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use settings_loader;
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/my_settings.json")?;
//!
//! // File (if any) plus environment, the way the server starts up
//! let settings = settings_loader::load_effective_settings(None)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use models::{LogFormat, Settings, StoreSettings};

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
pub const SETTINGS_PATH_ENV: &str = "BUDGET_SETTINGS";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_PATH)
}

/// Loads the provided path, or else the default location when it exists.
/// A provided path that is missing is an error, as is a file that fails to
/// parse; a missing default file is not.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    if let Some(settings_path) = path {
        if !settings_path.exists() {
            bail!("Settings file not found: {}", settings_path.display());
        }
        return load_settings(settings_path).map(Some);
    }

    let default_path = Path::new(DEFAULT_SETTINGS_PATH);
    if default_path.exists() {
        return load_default_settings().map(Some);
    }
    Ok(None)
}

/// File settings (or defaults) with environment overrides applied.
///
/// `explicit` wins over `BUDGET_SETTINGS`, which wins over `settings.json`.
pub fn load_effective_settings(explicit: Option<PathBuf>) -> Result<Settings> {
    // A missing .env is the normal case
    let _ = dotenvy::dotenv();

    let path = explicit.or_else(|| std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from));
    let settings = load_settings_with_fallback(path.as_ref())?.unwrap_or_default();
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// Applies environment-style overrides read through `lookup`.
pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        settings.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        settings.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PORT value: {port}"))?;
    }

    match (lookup("SUPABASE_URL"), lookup("SUPABASE_ANON_KEY")) {
        (Some(url), Some(api_key)) => {
            settings.store = StoreSettings::Supabase { url, api_key };
        }
        (None, None) => {}
        (Some(_), None) => bail!("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing"),
        (None, Some(_)) => bail!("SUPABASE_ANON_KEY is set but SUPABASE_URL is missing"),
    }

    if let Some(filter) = lookup("LOG_FILTER") {
        settings.logging.filter = filter;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        settings.logging.format = parse_log_format(&format)?;
    }

    validate(&settings)?;
    Ok(settings)
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "compact" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(anyhow!("Unknown LOG_FORMAT '{other}' (use pretty, compact or json)")),
    }
}

/// Checks that the settings can be used to start the server.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.server.host.trim().is_empty() {
        bail!("server.host must not be empty");
    }
    if let StoreSettings::Supabase { url, api_key } = &settings.store {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Supabase url must start with http:// or https://, got '{url}'");
        }
        if api_key.trim().is_empty() {
            bail!("Supabase api_key must not be empty");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let settings = apply_overrides(Settings::default(), lookup_from(&[])).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.store, StoreSettings::Memory);
    }

    #[test]
    fn test_env_overrides_server_and_store() {
        let settings = apply_overrides(
            Settings::default(),
            lookup_from(&[
                ("HOST", "0.0.0.0"),
                ("PORT", "8080"),
                ("SUPABASE_URL", "https://demo.supabase.co"),
                ("SUPABASE_ANON_KEY", "anon"),
                ("LOG_FORMAT", "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.store,
            StoreSettings::Supabase {
                url: "https://demo.supabase.co".to_string(),
                api_key: "anon".to_string(),
            }
        );
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = apply_overrides(Settings::default(), lookup_from(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_half_configured_supabase_is_rejected() {
        let result = apply_overrides(
            Settings::default(),
            lookup_from(&[("SUPABASE_URL", "https://demo.supabase.co")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_settings_from_file() {
        let path = std::env::temp_dir().join(format!(
            "budget_quest_settings_{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"server": {"host": "localhost", "port": 4000}, "logging": {"filter": "info"}}"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.server.host, "localhost");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.logging.filter, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/settings.json");
        let err = load_settings_with_fallback(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Settings file not found"));

        assert!(load_effective_settings(Some(missing)).is_err());
    }
}
