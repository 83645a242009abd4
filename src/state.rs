//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::{EnvironmentConfig, MaintenanceCatalog};
use crate::services::photo_storage::PhotoStorage;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub catalog: MaintenanceCatalog,
    pub storage: PhotoStorage,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, catalog: MaintenanceCatalog) -> Self {
        let storage = PhotoStorage::new(&config.upload_dir);
        Self {
            pool,
            config,
            catalog,
            storage,
        }
    }
}
