use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tax_core::{CalculationRecord, CalculationRepository, RepositoryError};
use tracing::debug;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to `connection_string`, a bare file path, `:memory:`, or a
    /// full `sqlite:` URL. Files are created when missing.
    ///
    /// In-memory databases live only as long as their connection, so their
    /// pool holds exactly one.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let url = database_url(connection_string);
        let mut options = SqlitePoolOptions::new();
        if is_in_memory(&url) {
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options
            .connect(&url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Turns a connection string into a sqlx SQLite URL.
///
/// | input                | URL                          |
/// |----------------------|------------------------------|
/// | `:memory:`           | `sqlite::memory:`            |
/// | `taxes.db`           | `sqlite:taxes.db?mode=rwc`   |
/// | `sqlite:taxes.db`    | unchanged                    |
pub fn database_url(connection_string: &str) -> String {
    let s = connection_string.trim();
    if s.starts_with("sqlite:") {
        s.to_string()
    } else if s == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{s}?mode=rwc")
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl CalculationRepository for SqliteRepository {
    async fn record_calculation(
        &self,
        record: &CalculationRecord,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO tax_calculations (income_amount, income_date, currency, rate, tax_amount)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.income_amount.to_string())
        .bind(record.income_date)
        .bind(record.currency.as_str())
        .bind(record.rate.to_string())
        .bind(record.tax_amount.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(id = result.last_insert_rowid(), "stored calculation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::Row;
    use tax_core::Currency;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    fn record() -> CalculationRecord {
        CalculationRecord {
            income_amount: dec!(1500.50),
            income_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            currency: Currency::Eur,
            rate: dec!(2.9876),
            tax_amount: dec!(89.66),
        }
    }

    #[test]
    fn database_url_maps_memory() {
        assert_eq!(database_url(":memory:"), "sqlite::memory:");
    }

    #[test]
    fn database_url_creates_missing_files() {
        assert_eq!(database_url("taxes.db"), "sqlite:taxes.db?mode=rwc");
    }

    #[test]
    fn database_url_keeps_full_urls() {
        assert_eq!(database_url("sqlite:taxes.db?mode=ro"), "sqlite:taxes.db?mode=ro");
    }

    #[test]
    fn in_memory_urls_are_detected() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:calcs?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:taxes.db?mode=rwc"));
    }

    #[tokio::test]
    async fn in_memory_database_keeps_schema_across_writes() {
        let repo = SqliteRepository::new(":memory:").await.unwrap();
        repo.run_migrations().await.unwrap();

        assert_eq!(repo.pool().options().get_max_connections(), 1);

        for _ in 0..3 {
            repo.record_calculation(&record()).await.unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tax_calculations")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn record_calculation_stores_every_field() {
        let repo = setup_test_db().await;

        repo.record_calculation(&record()).await.unwrap();

        let row = sqlx::query(
            "SELECT income_amount, income_date, currency, rate, tax_amount, created_at
             FROM tax_calculations",
        )
        .fetch_one(repo.pool())
        .await
        .expect("Failed to fetch row");

        let income: String = row.get("income_amount");
        let date: NaiveDate = row.get("income_date");
        let currency: String = row.get("currency");
        let rate: String = row.get("rate");
        let tax: String = row.get("tax_amount");
        let created_at: String = row.get("created_at");

        assert_eq!(income.parse::<Decimal>().unwrap(), dec!(1500.50));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(currency, "EUR");
        assert_eq!(rate.parse::<Decimal>().unwrap(), dec!(2.9876));
        assert_eq!(tax, "89.66");
        assert!(!created_at.is_empty());
    }

    #[tokio::test]
    async fn records_are_appended() {
        let repo = setup_test_db().await;

        repo.record_calculation(&record()).await.unwrap();
        repo.record_calculation(&record()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tax_calculations")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn missing_table_is_a_database_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = SqliteRepository::new_with_pool(pool).await;

        let result = repo.record_calculation(&record()).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
