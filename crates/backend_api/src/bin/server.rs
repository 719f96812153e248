use backend_api::{build_repository, run_server, AppState};
use models::StoreSettings;
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional first argument: settings file path
    let settings_path = env::args().nth(1).map(PathBuf::from);
    let settings = settings_loader::load_effective_settings(settings_path)?;

    logger::init(&settings.logging);

    let store_label = match &settings.store {
        StoreSettings::Memory => "in-memory (data is lost on restart)".to_string(),
        StoreSettings::Supabase { url, .. } => format!("supabase at {url}"),
    };
    tracing::info!(store = %store_label, "Budget Quest API");
    if matches!(settings.store, StoreSettings::Memory) {
        tracing::warn!(
            "No hosted store configured; set SUPABASE_URL and SUPABASE_ANON_KEY to persist data"
        );
    }

    let repo = build_repository(&settings.store)?;
    run_server(AppState::new(repo), &settings.server.host, settings.server.port).await?;

    Ok(())
}
