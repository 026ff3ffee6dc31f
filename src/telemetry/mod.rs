//! Logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.log_level`. Returns `false` if a subscriber
/// was already installed (embedding apps often set up their own).
pub fn init_tracing(config: &Config) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Patrol client logging initialized");
        tracing::info!("API base URL: {}", config.api_base_url);
        tracing::info!("Storage path: {:?}", config.storage_path);
    }

    installed
}
