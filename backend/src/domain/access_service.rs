//! Access token issuing and tenant authorisation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    AccessControl, AccessTokenError, AccessTokens, IssuedToken, TenantDirectory,
};
use crate::domain::{Error, TenantId};

/// Issues tokens to tenant owners and checks bearer tokens on tenant routes.
pub struct AccessService {
    tenants: Arc<dyn TenantDirectory>,
    tokens: Arc<dyn AccessTokens>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    enforce: bool,
}

impl AccessService {
    /// Create the service. With `enforce` unset, [`AccessControl::authorize`]
    /// allows every caller.
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        tokens: Arc<dyn AccessTokens>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        enforce: bool,
    ) -> Self {
        Self {
            tenants,
            tokens,
            clock,
            ttl,
            enforce,
        }
    }
}

#[async_trait]
impl AccessControl for AccessService {
    async fn issue_token(
        &self,
        tenant_id: &TenantId,
        email: &str,
        owner_key: &str,
    ) -> Result<IssuedToken, Error> {
        let tenant = self.tenants.by_id(tenant_id).await?;
        if !tenant.owner_credentials_match(email, owner_key) {
            debug!(tenant_id = %tenant.id, "owner credentials rejected");
            return Err(Error::forbidden("Owner credentials do not match"));
        }
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let token = self
            .tokens
            .issue(&tenant.id, issued_at, expires_at)
            .map_err(|err| {
                error!(error = %err, "token signing failed");
                Error::internal(err.to_string())
            })?;
        info!(tenant_id = %tenant.id, "access token issued");
        Ok(IssuedToken { token, expires_at })
    }

    fn authorize(&self, bearer: Option<&str>, tenant_id: &TenantId) -> Result<(), Error> {
        if !self.enforce {
            return Ok(());
        }
        let token = bearer.ok_or_else(|| Error::unauthorized("Missing bearer token"))?;
        let claims = self
            .tokens
            .verify(token, self.clock.utc())
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                match err {
                    AccessTokenError::Expired { .. } => Error::unauthorized("Token has expired"),
                    AccessTokenError::Invalid { .. } | AccessTokenError::Signing { .. } => {
                        Error::unauthorized("Invalid bearer token")
                    }
                }
            })?;
        if &claims.tenant_id != tenant_id {
            return Err(Error::forbidden("Token does not grant access to this tenant"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{AccessClaims, MockAccessTokens, MockTenantDirectory};
    use crate::domain::test_fixtures::{
        fixture_clock, fixture_timestamp, sample_owner_key, sample_tenant, tenant_id,
    };
    use rstest::rstest;

    fn service(
        tenants: MockTenantDirectory,
        tokens: MockAccessTokens,
        enforce: bool,
    ) -> AccessService {
        AccessService::new(
            Arc::new(tenants),
            Arc::new(tokens),
            fixture_clock(),
            Duration::minutes(60),
            enforce,
        )
    }

    #[tokio::test]
    async fn issue_token_for_owner_email() {
        let tenant = sample_tenant("acme");
        let id = tenant.id.clone();
        let mut tenants = MockTenantDirectory::new();
        tenants
            .expect_by_id()
            .times(1)
            .return_once(move |_| Ok(tenant));
        let mut tokens = MockAccessTokens::new();
        tokens
            .expect_issue()
            .times(1)
            .return_once(|_, _, _| Ok("signed".to_owned()));

        let issued = service(tenants, tokens, true)
            .issue_token(&id, "OWNER@acme.dk", sample_owner_key().as_str())
            .await
            .expect("issued");

        assert_eq!(issued.token, "signed");
        assert_eq!(issued.expires_at, fixture_timestamp() + Duration::minutes(60));
    }

    #[rstest]
    #[case::wrong_email("someone@else.dk", None)]
    #[case::missing_key("owner@acme.dk", Some(""))]
    #[case::guessed_key("owner@acme.dk", Some("owner@acme.dk"))]
    #[tokio::test]
    async fn issue_token_rejects_mismatched_credentials(
        #[case] email: &str,
        #[case] owner_key: Option<&str>,
    ) {
        let tenant = sample_tenant("acme");
        let id = tenant.id.clone();
        let mut tenants = MockTenantDirectory::new();
        tenants
            .expect_by_id()
            .times(1)
            .return_once(move |_| Ok(tenant));
        let mut tokens = MockAccessTokens::new();
        tokens.expect_issue().times(0);
        let real_key = sample_owner_key();

        let error = service(tenants, tokens, true)
            .issue_token(&id, email, owner_key.unwrap_or(real_key.as_str()))
            .await
            .expect_err("mismatched credentials");

        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), "Owner credentials do not match");
    }

    #[tokio::test]
    async fn issue_token_reports_unknown_tenant() {
        let mut tenants = MockTenantDirectory::new();
        tenants
            .expect_by_id()
            .times(1)
            .return_once(|_| Err(Error::not_found("Tenant not found")));

        let error = service(tenants, MockAccessTokens::new(), true)
            .issue_token(&tenant_id("tenant-x"), "owner@acme.dk", "key")
            .await
            .expect_err("unknown tenant");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[test]
    fn authorize_allows_everyone_when_not_enforced() {
        let access = service(MockTenantDirectory::new(), MockAccessTokens::new(), false);
        assert!(access.authorize(None, &tenant_id("tenant-a")).is_ok());
    }

    #[test]
    fn authorize_requires_bearer_when_enforced() {
        let access = service(MockTenantDirectory::new(), MockAccessTokens::new(), true);
        let error = access
            .authorize(None, &tenant_id("tenant-a"))
            .expect_err("missing bearer");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("tenant-a", None)]
    #[case("tenant-b", Some(ErrorCode::Forbidden))]
    fn authorize_compares_token_tenant(
        #[case] requested: &str,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut tokens = MockAccessTokens::new();
        tokens.expect_verify().times(1).return_once(|_, _| {
            Ok(AccessClaims {
                tenant_id: tenant_id("tenant-a"),
                expires_at: fixture_timestamp() + Duration::minutes(5),
            })
        });
        let access = service(MockTenantDirectory::new(), tokens, true);

        let outcome = access.authorize(Some("token"), &tenant_id(requested));

        assert_eq!(outcome.err().map(|error| error.code()), expected);
    }

    #[test]
    fn authorize_maps_expired_token_to_unauthorized() {
        let mut tokens = MockAccessTokens::new();
        tokens
            .expect_verify()
            .times(1)
            .return_once(|_, _| Err(AccessTokenError::expired("exp passed")));
        let access = service(MockTenantDirectory::new(), tokens, true);

        let error = access
            .authorize(Some("token"), &tenant_id("tenant-a"))
            .expect_err("expired");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "Token has expired");
    }
}
