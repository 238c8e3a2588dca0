//! Ports for signed access tokens.
//!
//! [`AccessTokens`] is the driven signing/verification collaborator (JWT in
//! production). [`AccessControl`] is the driving use-case HTTP handlers call
//! to issue tokens and to check that a bearer may act for a tenant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum AccessTokenError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token verified but has expired.
        Expired { message: String } => "access token has expired: {message}",
        /// A token could not be produced.
        Signing { message: String } => "access token could not be signed: {message}",
    }
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub tenant_id: TenantId,
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token signing and verification.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Sign a token for `tenant_id` valid until `expires_at`.
    fn issue(
        &self,
        tenant_id: &TenantId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AccessTokenError>;

    /// Verify a token against `now` and return its claims.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, AccessTokenError>;
}

/// Token issuing and authorisation use-cases.
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Issue a token when both the owner email and the owner key handed out
    /// at signup match the tenant.
    async fn issue_token(
        &self,
        tenant_id: &TenantId,
        email: &str,
        owner_key: &str,
    ) -> Result<IssuedToken, Error>;

    /// Check that the bearer token (if any) may act for `tenant_id`.
    ///
    /// When enforcement is disabled every caller is allowed.
    fn authorize(&self, bearer: Option<&str>, tenant_id: &TenantId) -> Result<(), Error>;
}
