//! `sqlx`-backed account store.

use async_trait::async_trait;
use ledgerload_store::{AccountStore, IsolationLevel, StoreError};
use ledgerload_types::{AccountId, Transfer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS account (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    balance DOUBLE PRECISION NOT NULL
)";

const TRUNCATE: &str = "TRUNCATE account";

const SEED: &str = "INSERT INTO account (balance)
    SELECT $2 FROM generate_series(1, $1)";

const FETCH_IDS: &str = "SELECT id FROM account ORDER BY random() LIMIT $1";

// One compound statement updates both rows in a single round trip, so the
// transfer needs no read-then-write step.
const TRANSFER: &str = "UPDATE account
    SET balance = CASE
        WHEN id = $1 THEN balance - $3
        WHEN id = $2 THEN balance + $3
    END
    WHERE id IN ($1, $2)";

const BALANCE: &str = "SELECT balance FROM account WHERE id = $1";

const TOTAL_BALANCE: &str = "SELECT COALESCE(SUM(balance), 0) FROM account";

/// Connection pool configuration.
///
/// The defaults keep the pool small and recycle connections aggressively,
/// which suits a load generator pointed at a store that may be draining or
/// restarting nodes mid-run.
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    /// Datastore connection string.
    pub url: String,

    /// Maximum concurrent connections.
    pub max_connections: u32,

    /// Maximum lifetime of a pooled connection before it is replaced.
    pub max_lifetime: Duration,

    /// How long to wait for a connection from the pool.
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    /// Configuration with default pool sizing for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 3,
            max_lifetime: Duration::from_secs(15),
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set the maximum pooled connection lifetime.
    pub fn with_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }
}

/// Account store backed by a PostgreSQL-compatible database.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool according to `config`.
    ///
    /// Fails fast on a malformed connection string or an unreachable
    /// server.
    pub async fn connect(config: PgStoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(config.max_lifetime)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(map_error)?;

        info!(
            max_connections = config.max_connections,
            max_lifetime_secs = config.max_lifetime.as_secs(),
            "connected account store pool"
        );
        Ok(Self { pool })
    }

    /// Round-trip a trivial statement to verify connectivity.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn truncate_accounts(&self) -> Result<(), StoreError> {
        sqlx::query(TRUNCATE)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn seed_accounts(&self, count: u32, initial_balance: f64) -> Result<u64, StoreError> {
        let result = sqlx::query(SEED)
            .bind(count as i64)
            .bind(initial_balance)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        debug!(rows = result.rows_affected(), "seeded account rows");
        Ok(result.rows_affected())
    }

    async fn account_ids(&self, limit: u32) -> Result<Vec<AccountId>, StoreError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(FETCH_IDS)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(ids.into_iter().map(AccountId::from).collect())
    }

    async fn apply_transfer(
        &self,
        transfer: &Transfer,
        isolation: IsolationLevel,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_error)?;

        let set_isolation = format!("SET TRANSACTION ISOLATION LEVEL {}", isolation.as_sql());
        sqlx::query(&set_isolation)
            .execute(&mut *tx)
            .await
            .map_err(map_error)?;

        let result = sqlx::query(TRANSFER)
            .bind(transfer.from.0)
            .bind(transfer.to.0)
            .bind(transfer.amount as f64)
            .execute(&mut *tx)
            .await
            .map_err(map_error)?;

        // A partial match means one of the ids has no row. Returning here
        // drops the transaction and rolls the statement back.
        if result.rows_affected() != 2 {
            return Err(StoreError::Backend(format!(
                "transfer matched {} rows, expected 2",
                result.rows_affected()
            )));
        }

        tx.commit().await.map_err(map_error)
    }

    async fn balance(&self, id: AccountId) -> Result<f64, StoreError> {
        let balance: Option<f64> = sqlx::query_scalar(BALANCE)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;
        balance.ok_or(StoreError::AccountNotFound(id))
    }

    async fn total_balance(&self) -> Result<f64, StoreError> {
        sqlx::query_scalar(TOTAL_BALANCE)
            .fetch_one(&self.pool)
            .await
            .map_err(map_error)
    }
}

/// SQLSTATE codes the retry wrapper is allowed to resolve.
///
/// 40001 is a serialization failure; 40P01 is a deadlock, which serializable
/// stores also report for retryable contention.
fn is_retryable_code(code: &str) -> bool {
    matches!(code, "40001" | "40P01")
}

fn map_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => match db.code() {
            Some(code) if is_retryable_code(&code) => {
                StoreError::Serialization(db.message().to_string())
            }
            _ => StoreError::Backend(db.message().to_string()),
        },
        _ => StoreError::Backend(err.to_string()),
    }
}
