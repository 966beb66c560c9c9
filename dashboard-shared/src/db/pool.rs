/// MySQL connection pool management
///
/// Both stores the dashboard reads from (the primary `societe` database and
/// the secondary legal-unit database) are MySQL. This module builds a pool
/// for either of them and refuses to hand it out until a liveness round-trip
/// succeeded within the configured timeout.
///
/// # Example
///
/// ```no_run
/// use dashboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let config = DatabaseConfig {
///     host: "db.internal".to_string(),
///     database: "dashboard".to_string(),
///     ..Default::default()
/// };
///
/// let pool = create_pool(&config).await?;
/// let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM societe")
///     .fetch_one(&pool)
///     .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for one MySQL pool
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Login user
    pub username: String,

    /// Login password (may be empty)
    pub password: String,

    /// Database (schema) name
    pub database: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections kept warm
    pub min_connections: u32,

    /// Bound on the startup liveness check and on connection acquisition (seconds)
    pub connect_timeout_seconds: u64,

    /// Idle connections are reaped after this long (seconds)
    pub idle_timeout_seconds: Option<u64>,

    /// Connections are recycled after this long (seconds)
    pub max_lifetime_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "dashboard".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: Some(60),
            max_lifetime_seconds: Some(1800),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password_set", &!self.password.is_empty())
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .field("max_lifetime_seconds", &self.max_lifetime_seconds)
            .finish()
    }
}

impl DatabaseConfig {
    /// `user@host:port/database`, safe to log
    pub fn describe(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    fn pool_options(&self) -> MySqlPoolOptions {
        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_seconds));

        if let Some(idle_timeout) = self.idle_timeout_seconds {
            pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        }

        if let Some(max_lifetime) = self.max_lifetime_seconds {
            pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
        }

        pool_options
    }
}

/// Creates a pool and verifies the server answers
///
/// The pool is created lazily, then a `SELECT 1` must succeed within
/// `connect_timeout_seconds`. On failure the pool is closed before the
/// error is returned, so callers never hold a half-open pool.
///
/// # Errors
///
/// - `sqlx::Error::PoolTimedOut` if the check did not finish in time
/// - Any connection or query error raised by the check
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    info!(
        db = %config.describe(),
        max_connections = config.max_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let pool = config
        .pool_options()
        .connect_lazy_with(config.connect_options());

    let timeout = Duration::from_secs(config.connect_timeout_seconds);
    match tokio::time::timeout(timeout, health_check(&pool)).await {
        Ok(Ok(())) => {
            info!(db = %config.describe(), "Database connection pool ready");
            Ok(pool)
        }
        Ok(Err(e)) => {
            warn!(db = %config.describe(), error = %e, "Database liveness check failed");
            pool.close().await;
            Err(e)
        }
        Err(_) => {
            warn!(
                db = %config.describe(),
                timeout_seconds = config.connect_timeout_seconds,
                "Database liveness check timed out"
            );
            pool.close().await;
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

/// Performs a trivial round-trip on the pool
pub async fn health_check(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    // MySQL types integer literals as BIGINT
    let result: i64 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;

    if result == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Closes a pool, waiting for checked-out connections to come back
pub async fn close_pool(pool: MySqlPool, name: &str) {
    info!(store = name, "Closing database connection pool");
    pool.close().await;
    info!(store = name, "Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.port, 3306);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout_seconds, 5);
        assert_eq!(config.idle_timeout_seconds, Some(60));
    }

    #[test]
    fn test_describe_and_debug_hide_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };

        assert_eq!(config.describe(), "root@localhost:3306/dashboard");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("password_set: true"));
    }

    #[tokio::test]
    async fn test_create_pool_unreachable_server_fails_fast() {
        // Port 9 (discard) on loopback is not a MySQL server
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            connect_timeout_seconds: 1,
            ..Default::default()
        };

        let started = std::time::Instant::now();
        let result = create_pool(&config).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
