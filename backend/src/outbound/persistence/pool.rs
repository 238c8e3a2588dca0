//! bb8 pool of `diesel-async` PostgreSQL connections shared by the Diesel
//! repositories.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool failures, surfaced by repositories as connection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection was free before the checkout timeout.
    #[error("database connection unavailable: {message}")]
    Unavailable { message: String },
    /// The pool could not be set up against the database URL.
    #[error("database pool setup failed: {message}")]
    Setup { message: String },
}

/// Where to connect and how many connections to hold.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use lejio::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/lejio")
///     .with_max_connections(4)
///     .with_checkout_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_connections(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool size. Zero is raised to one.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool. Connections are established lazily on checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Setup`] when bb8 rejects the configuration.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_connections,
            checkout_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Setup {
                message: err.to_string(),
            })?;
        Ok(Self { inner })
    }

    /// Borrow a connection for one repository call.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Unavailable`] when the checkout times out.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Unavailable {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(16, 16)]
    fn pool_holds_at_least_one_connection(#[case] requested: u32, #[case] expected: u32) {
        let config = PoolConfig::new("postgres://localhost/lejio").with_max_connections(requested);

        assert_eq!(config.max_connections(), expected);
    }

    #[rstest]
    fn unset_limits_use_defaults() {
        let config = PoolConfig::new("postgres://localhost/lejio");

        assert_eq!(config.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }
}
