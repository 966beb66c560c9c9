/// Configuration management for the API server
///
/// This module loads configuration from environment variables (with `.env`
/// support) and provides a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `HOST`, `PORT`: bind address (default: 0.0.0.0:3001)
/// - `FRONTEND_URL`: comma-separated CORS origins, `*` for any (default: http://localhost:5173)
/// - `PRODUCTION`: enables HSTS (default: false)
/// - `JWT_SECRET`: HS256 signing secret, at least 32 characters (required)
/// - `JWT_EXPIRATION_HOURS`: token lifetime, 1 to 8760 (default: 24)
/// - `ADMIN_ID`, `ADMIN_USERNAME`, `ADMIN_EMAIL`: the dashboard account
/// - `ADMIN_PASSWORD_HASH` or `ADMIN_PASSWORD`: its password (one is required)
/// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`: primary store
/// - `DB2_HOST`, `DB2_PORT`, `DB2_USER`, `DB2_PASSWORD`, `DB2_NAME`: legal unit store
/// - `DB_CONNECT_TIMEOUT_SECS`: startup liveness timeout (default: 5)
/// - `DB_RECONNECT_INTERVAL_SECS`: reconnect period, 0 disables (default: 30)
///
/// # Example
///
/// ```no_run
/// use dashboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use chrono::Duration;
use dashboard_shared::auth::credentials::Credentials;
use dashboard_shared::auth::password::PasswordError;
use dashboard_shared::db::pool::DatabaseConfig;
use dashboard_shared::models::User;
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Accepted token lifetimes, in hours (up to one year)
const EXPIRATION_HOURS: RangeInclusive<i64> = 1..=8760;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// The single dashboard account
    pub admin: AdminConfig,

    /// Both MySQL stores
    pub database: DatabaseSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS)
    pub production: bool,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing, at least 32 bytes
    pub secret: String,

    /// Token lifetime in hours
    pub expiration_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    /// Token lifetime
    pub fn expiration(&self) -> Duration {
        Duration::hours(self.expiration_hours)
    }
}

/// How the account password was supplied
#[derive(Clone)]
pub enum AdminPassword {
    /// PHC-formatted Argon2 hash
    Hash(String),

    /// Plaintext, hashed once at startup
    Plaintext(String),
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminPassword::Hash(_) => f.write_str("Hash(<redacted>)"),
            AdminPassword::Plaintext(_) => f.write_str("Plaintext(<redacted>)"),
        }
    }
}

/// The dashboard account
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Public projection returned on login
    pub user: User,

    /// Password source
    pub password: AdminPassword,
}

impl AdminConfig {
    /// Builds the credential checker, hashing a plaintext password if needed
    pub fn credentials(&self) -> Result<Credentials, PasswordError> {
        match &self.password {
            AdminPassword::Hash(hash) => Credentials::from_hash(self.user.clone(), hash.clone()),
            AdminPassword::Plaintext(password) => {
                Credentials::from_plaintext(self.user.clone(), password)
            }
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Primary (`societe`) store
    pub primary: DatabaseConfig,

    /// Secondary (legal unit) store
    pub secondary: DatabaseConfig,

    /// Seconds between reconnect attempts; 0 disables the supervisor
    pub reconnect_interval_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - Neither `ADMIN_PASSWORD_HASH` nor `ADMIN_PASSWORD` is set
    /// - A numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let jwt_secret = lookup("JWT_SECRET")
            .context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let password = match (lookup("ADMIN_PASSWORD_HASH"), lookup("ADMIN_PASSWORD")) {
            (Some(hash), _) if !hash.trim().is_empty() => AdminPassword::Hash(hash.trim().to_string()),
            (_, Some(password)) if !password.is_empty() => AdminPassword::Plaintext(password),
            _ => anyhow::bail!("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD environment variable is required"),
        };

        let expiration_hours: i64 = parse(&var("JWT_EXPIRATION_HOURS", "24"), "JWT_EXPIRATION_HOURS")?;
        if !EXPIRATION_HOURS.contains(&expiration_hours) {
            anyhow::bail!(
                "JWT_EXPIRATION_HOURS must be between {} and {}, got {}",
                EXPIRATION_HOURS.start(),
                EXPIRATION_HOURS.end(),
                expiration_hours
            );
        }

        let connect_timeout_seconds: u64 = parse(&var("DB_CONNECT_TIMEOUT_SECS", "5"), "DB_CONNECT_TIMEOUT_SECS")?;

        let store = |prefix: &str, database: &str, max_connections: u32| -> anyhow::Result<DatabaseConfig> {
            let port_key = format!("{}_PORT", prefix);
            Ok(DatabaseConfig {
                host: var(&format!("{}_HOST", prefix), "localhost"),
                port: parse(&var(&port_key, "3306"), &port_key)?,
                username: var(&format!("{}_USER", prefix), "root"),
                password: lookup(&format!("{}_PASSWORD", prefix)).unwrap_or_default(),
                database: var(&format!("{}_NAME", prefix), database),
                max_connections,
                connect_timeout_seconds,
                idle_timeout_seconds: Some(60),
                ..Default::default()
            })
        };

        Ok(Self {
            server: ServerConfig {
                host: var("HOST", "0.0.0.0"),
                port: parse(&var("PORT", "3001"), "PORT")?,
                cors_origins: var("FRONTEND_URL", "http://localhost:5173")
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
                production: parse(&var("PRODUCTION", "false"), "PRODUCTION")?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours,
            },
            admin: AdminConfig {
                user: User {
                    id: var("ADMIN_ID", "1"),
                    username: var("ADMIN_USERNAME", "admin"),
                    email: var("ADMIN_EMAIL", "admin@dashboard.local"),
                },
                password,
            },
            database: DatabaseSettings {
                primary: store("DB", "dashboard", 10)?,
                secondary: store("DB2", "legal_unit_db", 5)?,
                reconnect_interval_seconds: parse(
                    &var("DB_RECONNECT_INTERVAL_SECS", "30"),
                    "DB_RECONNECT_INTERVAL_SECS",
                )?,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T>(value: &str, key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{} has an invalid value: {}", key, value))
}
