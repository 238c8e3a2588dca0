//! Tenant signup and lookup service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{TenantDirectory, TenantRepository, TenantRepositoryError};
use crate::domain::{
    Error, OwnerKey, Subdomain, Tenant, TenantId, TenantRegistration, TenantSignup,
};

fn map_repository_error(error: TenantRepositoryError) -> Error {
    match error {
        TenantRepositoryError::DuplicateSubdomain { subdomain } => {
            Error::conflict("Subdomain is already taken").with_details(json!({
                "field": "subdomain",
                "value": subdomain,
                "code": "duplicate_subdomain",
            }))
        }
        TenantRepositoryError::Connection { message } | TenantRepositoryError::Query { message } => {
            error!(%message, "tenant store failure");
            Error::internal(message)
        }
    }
}

/// Tenant directory backed by a [`TenantRepository`].
pub struct TenantService<R: ?Sized> {
    tenants: Arc<R>,
    clock: Arc<dyn Clock>,
    root_domain: String,
    trial_days: u32,
}

impl<R: ?Sized> TenantService<R> {
    /// Create the service. New tenants get `<subdomain>.<root_domain>` and a
    /// trial lasting `trial_days`.
    pub fn new(
        tenants: Arc<R>,
        clock: Arc<dyn Clock>,
        root_domain: impl Into<String>,
        trial_days: u32,
    ) -> Self {
        Self {
            tenants,
            clock,
            root_domain: root_domain.into(),
            trial_days,
        }
    }
}

#[async_trait]
impl<R> TenantDirectory for TenantService<R>
where
    R: TenantRepository + ?Sized,
{
    async fn signup(&self, signup: TenantSignup) -> Result<TenantRegistration, Error> {
        let taken = self
            .tenants
            .find_by_subdomain(&signup.subdomain)
            .await
            .map_err(map_repository_error)?;
        if taken.is_some() {
            return Err(map_repository_error(
                TenantRepositoryError::duplicate_subdomain(signup.subdomain.as_str()),
            ));
        }
        let owner_key = OwnerKey::generate();
        let tenant = Tenant::from_signup(
            signup,
            &owner_key,
            &self.root_domain,
            self.trial_days,
            self.clock.utc(),
        );
        self.tenants
            .insert(&tenant)
            .await
            .map_err(map_repository_error)?;
        info!(tenant_id = %tenant.id, subdomain = %tenant.subdomain, "tenant signed up");
        Ok(TenantRegistration { tenant, owner_key })
    }

    async fn by_subdomain(&self, subdomain: &str) -> Result<Tenant, Error> {
        let not_found = || Error::not_found("Tenant not found");
        let Ok(subdomain) = Subdomain::new(subdomain.to_ascii_lowercase()) else {
            return Err(not_found());
        };
        self.tenants
            .find_by_subdomain(&subdomain)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)
    }

    async fn by_id(&self, tenant_id: &TenantId) -> Result<Tenant, Error> {
        self.tenants
            .find_by_id(tenant_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Tenant not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTenantRepository;
    use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp, sample_tenant};
    use chrono::Duration;
    use rstest::rstest;

    fn service(repo: MockTenantRepository) -> TenantService<MockTenantRepository> {
        TenantService::new(Arc::new(repo), fixture_clock(), "lejio-fri.dk", 30)
    }

    fn signup() -> TenantSignup {
        TenantSignup::new("Acme Biler", "owner@acme.dk", "acme").expect("valid signup")
    }

    #[tokio::test]
    async fn signup_creates_trial_tenant_under_root_domain() {
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_subdomain()
            .times(1)
            .return_once(|_| Ok(None));
        repo.expect_insert().times(1).return_once(|_| Ok(()));

        let TenantRegistration { tenant, owner_key } =
            service(repo).signup(signup()).await.expect("signup");

        assert_eq!(tenant.domain, "acme.lejio-fri.dk");
        assert_eq!(
            tenant.trial_end_date,
            fixture_timestamp() + Duration::days(30)
        );
        assert!(tenant.owner_key_digest.matches(owner_key.as_str()));
        assert_ne!(tenant.owner_key_digest.as_str(), owner_key.as_str());
    }

    #[tokio::test]
    async fn signup_rejects_taken_subdomain() {
        let existing = sample_tenant("acme");
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_subdomain()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_insert().times(0);

        let error = service(repo).signup(signup()).await.expect_err("taken");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn signup_maps_store_failure_to_internal() {
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_subdomain()
            .times(1)
            .return_once(|_| Err(TenantRepositoryError::connection("pool closed")));

        let error = service(repo).signup(signup()).await.expect_err("failure");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case("ACME")]
    #[case("acme")]
    #[tokio::test]
    async fn by_subdomain_is_case_insensitive(#[case] raw: &str) {
        let existing = sample_tenant("acme");
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_subdomain()
            .withf(|subdomain: &Subdomain| subdomain.as_str() == "acme")
            .times(1)
            .return_once(move |_| Ok(Some(existing)));

        let tenant = service(repo).by_subdomain(raw).await.expect("found");

        assert_eq!(tenant.subdomain.as_str(), "acme");
    }

    #[rstest]
    #[case("a")]
    #[case("not a subdomain")]
    #[tokio::test]
    async fn malformed_subdomain_is_not_found(#[case] raw: &str) {
        let mut repo = MockTenantRepository::new();
        repo.expect_find_by_subdomain().times(0);

        let error = service(repo).by_subdomain(raw).await.expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
