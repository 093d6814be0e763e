pub mod config;
pub mod models;
pub mod db;
pub mod crypto;
pub mod report; // Severity report resolution + PDF export
pub mod chatbot; // Rule-based eye-care assistant
pub mod providers; // Prediction model + notification seams
pub mod screening; // Signed-in session workflow

use tracing_subscriber::EnvFilter;

/// Install the global log subscriber. `RUST_LOG` wins over the default
/// filter. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
