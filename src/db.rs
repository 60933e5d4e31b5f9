use crate::config::AppConfig;
use crate::errors::ServiceError;
use metrics::{counter, gauge};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
    /// Statement timeout, applied per transaction on Postgres
    pub statement_timeout: Option<Duration>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
            statement_timeout: None,
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
            statement_timeout: cfg.db_statement_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Establishes a connection pool with default tuning
pub async fn establish_connection(database_url: &str) -> Result<DbPool, ServiceError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool to the database with custom configuration
///
/// # Errors
/// Returns a `ServiceError::DatabaseError` if the connection cannot be established
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Configuring database connection"
    );

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    gauge!("caroption_db.max_connections", config.max_connections as f64);

    let db_pool = Database::connect(opt).await.map_err(|e| {
        error!("Database connection establishment failed: {}", e);
        counter!("caroption_db.connection_failures", 1);
        ServiceError::DatabaseError(e)
    })?;

    info!(
        backend = ?db_pool.get_database_backend(),
        "Database connection pool established"
    );

    Ok(db_pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(
    cfg: &AppConfig,
) -> Result<DbPool, ServiceError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Runs the embedded migrations up to the latest version
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    let start = std::time::Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(|e| ServiceError::MigrationError(e.to_string()));

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!("Database migrations completed in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    let start = std::time::Instant::now();

    let result = pool.ping().await.map_err(ServiceError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            debug!("Database connection check successful in {:?}", elapsed);
            gauge!("caroption_db.connection_latency", elapsed.as_millis() as f64);
        }
        Err(e) => {
            error!("Database connection check failed after {:?}: {}", elapsed, e);
            counter!("caroption_db.connection_failures", 1);
        }
    }

    result
}

/// Bounds every statement of the current Postgres transaction.
///
/// No-op on other backends.
pub async fn set_local_statement_timeout<C>(
    conn: &C,
    timeout: Option<Duration>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let Some(timeout) = timeout else {
        return Ok(());
    };
    if conn.get_database_backend() != DbBackend::Postgres {
        return Ok(());
    }

    let sql = format!("SET LOCAL statement_timeout = {}", timeout.as_millis());
    conn.execute(Statement::from_string(DbBackend::Postgres, sql))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn file_pool(dir: &TempDir) -> DbPool {
        let url = format!("sqlite://{}/db.sqlite?mode=rwc", dir.path().display());
        establish_connection(&url).await.unwrap()
    }

    #[tokio::test]
    async fn connects_and_migrates_sqlite() {
        let dir = TempDir::new().unwrap();
        let pool = file_pool(&dir).await;

        assert!(check_connection(&pool).await.is_ok());
        run_migrations(&pool).await.unwrap();
        // Second run is a no-op
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn statement_timeout_is_ignored_on_sqlite() {
        let dir = TempDir::new().unwrap();
        let pool = file_pool(&dir).await;

        set_local_statement_timeout(&pool, Some(Duration::from_secs(5)))
            .await
            .unwrap();
    }

    #[test]
    fn db_config_follows_app_config() {
        let mut app = AppConfig::new(
            "postgres://localhost/caroption".into(),
            "x9Kf2LmQ7rT4vW8zB1nC6dE3gH5jP0sU".into(),
            3600,
            "0.0.0.0".into(),
            8080,
            "development".into(),
        );
        app.db_max_connections = 25;
        app.db_statement_timeout_secs = Some(60);

        let cfg = DbConfig::from(&app);
        assert_eq!(cfg.max_connections, 25);
        assert_eq!(cfg.statement_timeout, Some(Duration::from_secs(60)));
    }
}
