//! HTTP server configuration object.

use std::net::SocketAddr;

use chrono::Duration;

use super::state_builders::Repositories;

const DEFAULT_ROOT_DOMAIN: &str = "lejio-fri.dk";
const DEFAULT_TRIAL_DAYS: u32 = 30;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repositories: Repositories,
    pub(crate) root_domain: String,
    pub(crate) trial_days: u32,
    pub(crate) token_secret: Option<Vec<u8>>,
    pub(crate) token_ttl: Duration,
}

impl ServerConfig {
    /// Configuration with development defaults and token checks disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, repositories: Repositories) -> Self {
        Self {
            bind_addr,
            repositories,
            root_domain: DEFAULT_ROOT_DOMAIN.to_owned(),
            trial_days: DEFAULT_TRIAL_DAYS,
            token_secret: None,
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Domain under which tenant subdomains are served.
    #[must_use]
    pub fn with_root_domain(mut self, root_domain: impl Into<String>) -> Self {
        self.root_domain = root_domain.into();
        self
    }

    #[must_use]
    pub fn with_trial_days(mut self, trial_days: u32) -> Self {
        self.trial_days = trial_days;
        self
    }

    /// Sign tokens with `secret` and require them on tenant-scoped routes.
    #[must_use]
    pub fn with_token_secret(mut self, secret: Option<&[u8]>) -> Self {
        self.token_secret = secret.map(<[u8]>::to_vec);
        self
    }

    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
