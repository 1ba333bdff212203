//! Calculation sink writing to a Cloud Firestore `users` collection.
//!
//! Each successful remote-rate calculation becomes one new document with
//! the fields below, written with the signed-in user's ID token.
//!
//! | field                                | Firestore type |
//! |--------------------------------------|----------------|
//! | `incomeAmount`                       | double         |
//! | `incomeDate`                         | string (`YYYY-MM-DD`) |
//! | `currency`                           | string         |
//! | `bankRateForSelectedDateAndCurrency` | double         |
//! | `taxAmountInLari`                    | string (two decimals) |

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tax_core::calculations::common::round_half_up;
use tax_core::db::{DbConfig, RepositoryFactory};
use tax_core::{CalculationRecord, CalculationRepository, RepositoryError};
use tracing::debug;

use crate::client::{DEFAULT_TIMEOUT, http_client, snippet};

/// Firestore REST API root.
pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

const COLLECTION: &str = "users";

pub struct FirestoreRepository {
    client: Client,
    documents_url: String,
    token: String,
}

impl FirestoreRepository {
    pub fn new(
        client: Client,
        project_id: &str,
        token: String,
    ) -> Self {
        Self {
            client,
            documents_url: documents_url(FIRESTORE_API_URL, project_id),
            token,
        }
    }
}

/// Collection URL new documents are posted to.
pub fn documents_url(
    api_url: &str,
    project_id: &str,
) -> String {
    format!(
        "{}/projects/{}/databases/(default)/documents/{}",
        api_url.trim_end_matches('/'),
        project_id,
        COLLECTION
    )
}

/// Firestore document body for `record`.
///
/// # Errors
/// [`RepositoryError::Database`] when an amount has no finite `f64` form.
pub fn encode_document(record: &CalculationRecord) -> Result<Value, RepositoryError> {
    let income = decimal_to_f64("incomeAmount", record.income_amount)?;
    let rate = decimal_to_f64("bankRateForSelectedDateAndCurrency", record.rate)?;

    Ok(json!({
        "fields": {
            "incomeAmount": { "doubleValue": income },
            "incomeDate": { "stringValue": record.income_date.format("%Y-%m-%d").to_string() },
            "currency": { "stringValue": record.currency.as_str() },
            "bankRateForSelectedDateAndCurrency": { "doubleValue": rate },
            "taxAmountInLari": { "stringValue": round_half_up(record.tax_amount).to_string() }
        }
    }))
}

fn decimal_to_f64(
    field: &str,
    d: Decimal,
) -> Result<f64, RepositoryError> {
    d.to_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| RepositoryError::Database(format!("{field} {d} cannot be stored as a double")))
}

#[async_trait]
impl CalculationRepository for FirestoreRepository {
    async fn record_calculation(
        &self,
        record: &CalculationRecord,
    ) -> Result<(), RepositoryError> {
        let document = encode_document(record)?;
        let response = self
            .client
            .post(&self.documents_url)
            .bearer_auth(&self.token)
            .json(&document)
            .send()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(collection = COLLECTION, "stored calculation document");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RepositoryError::Unauthorized(
                format!("HTTP {status}: {}", snippet(&body)),
            )),
            _ => Err(RepositoryError::Database(format!(
                "HTTP {status}: {}",
                snippet(&body)
            ))),
        }
    }
}

/// [`RepositoryFactory`] for Firestore.
///
/// `connection_string` is the Firebase project id; `auth_token` must hold the
/// signed-in user's ID token.
pub struct FirestoreRepositoryFactory;

#[async_trait]
impl RepositoryFactory for FirestoreRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
        let project_id = config.connection_string.trim();
        if project_id.is_empty() {
            return Err(RepositoryError::Configuration(
                "firestore backend needs a project id".to_string(),
            ));
        }
        let token = config
            .auth_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                RepositoryError::Unauthorized("firestore writes need a signed-in user".to_string())
            })?;

        Ok(Box::new(FirestoreRepository::new(
            http_client(DEFAULT_TIMEOUT),
            project_id,
            token,
        )))
    }
}
