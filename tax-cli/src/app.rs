//! Wiring of the calculator's collaborators.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use tax_core::db::{CalculationRepository, DbConfig, RepositoryRegistry};
use tax_core::services::{Session, TaxService};
use tax_db_sqlite::SqliteRepositoryFactory;
use tax_http::{FirebaseMessageClient, FirestoreRepositoryFactory, NbgRateClient};

use crate::config::AppConfig;

/// Registry holding every compiled-in sink backend.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(FirestoreRepositoryFactory));
    registry
}

/// Opens the calculation sink for a signed-in session.
///
/// Anonymous sessions never record, so no sink is opened for them.
pub async fn open_sink(
    registry: &RepositoryRegistry,
    db_config: &DbConfig,
    session: &Session,
) -> Result<Option<Arc<dyn CalculationRepository>>> {
    if !session.is_authenticated() {
        debug!("anonymous session; calculations are not recorded");
        return Ok(None);
    }

    let repo = registry
        .create(db_config)
        .await
        .with_context(|| format!("failed to open '{}' storage", db_config.backend))?;
    Ok(Some(Arc::from(repo)))
}

/// Builds the tax service against the NBG rate API.
pub fn build_tax_service(
    config: &AppConfig,
    sink: Option<Arc<dyn CalculationRepository>>,
) -> TaxService {
    let rates = NbgRateClient::new(config.rates.base_url.clone(), config.rates.timeout());
    let service = TaxService::new(Arc::new(rates));
    match sink {
        Some(sink) => service.with_sink(sink),
        None => service,
    }
}

/// Message client for the configured Realtime Database, if any.
pub fn build_message_client(config: &AppConfig) -> Option<FirebaseMessageClient> {
    let url = config.firebase.database_url.as_deref()?.trim();
    if url.is_empty() {
        warn!("firebase.database_url is empty; server message disabled");
        return None;
    }
    Some(FirebaseMessageClient::new(url, config.rates.timeout()))
}
