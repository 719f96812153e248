pub mod error;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod server;
pub mod session;
pub mod state;
pub mod supabase;

use std::sync::Arc;

use models::StoreSettings;

pub use error::{ApiError, Result};
pub use repository::{BudgetRepository, Caller, InMemoryBudgetRepository};
pub use router::create_router;
pub use server::run_server;
pub use session::Session;
pub use state::AppState;
pub use supabase::SupabaseRepository;

/// Builds the repository selected in settings.
pub fn build_repository(store: &StoreSettings) -> anyhow::Result<Arc<dyn BudgetRepository>> {
    match store {
        StoreSettings::Memory => Ok(Arc::new(InMemoryBudgetRepository::new())),
        StoreSettings::Supabase { url, api_key } => {
            Ok(Arc::new(SupabaseRepository::new(url, api_key)?))
        }
    }
}
