//! Patrol client data layer.
//!
//! Form schemas, on-device storage and typed access to the Patrol backend
//! API for the field operations app.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod query;
pub mod schemas;
pub mod session;
pub mod storage;
pub mod telemetry;

use std::sync::Arc;

use api::ApiClient;
use config::Config;
use errors::ClientResult;
use query::QueryClient;
use session::Session;
use storage::{SqliteStorage, StorageHelper, StorageKeys};

pub use errors::{ClientError, ValidationError, ValidationErrors};

/// Everything an app screen needs, built once at startup.
#[derive(Clone)]
pub struct PatrolClient {
    pub api: ApiClient,
    pub storage: StorageHelper,
    pub queries: Arc<QueryClient>,
    pub session: Session,
    pub config: Arc<Config>,
}

impl PatrolClient {
    /// Open persistent storage and wire up the API and query clients.
    pub async fn connect(config: Config) -> ClientResult<Self> {
        let adapter = SqliteStorage::open(&config.storage_path).await?;
        let storage = StorageHelper::new(
            Arc::new(adapter),
            StorageKeys::new(config.storage_prefix.clone()),
        );
        Self::with_storage(config, storage)
    }

    /// Build around an existing storage helper.
    pub fn with_storage(config: Config, storage: StorageHelper) -> ClientResult<Self> {
        let api = ApiClient::from_config(&config)?;
        let queries = Arc::new(QueryClient::new(config.query.clone()));
        let session = Session::new(api.clone(), storage.clone());

        tracing::debug!("Patrol client ready for {}", config.api_base_url);

        Ok(Self {
            api,
            storage,
            queries,
            session,
            config: Arc::new(config),
        })
    }
}
