//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{OwnerKey, PageDraft, PageTitle, Slug, Tenant, TenantId, TenantSignup};

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub(crate) fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_timestamp()))
}

pub(crate) fn tenant_id(raw: &str) -> TenantId {
    TenantId::new(raw).expect("valid tenant id")
}

pub(crate) fn page_draft(tenant: &str, slug: &str) -> PageDraft {
    PageDraft {
        tenant_id: tenant_id(tenant),
        title: PageTitle::new("Forside").expect("valid title"),
        slug: Slug::new(slug).expect("valid slug"),
        meta_description: None,
    }
}

/// Owner key behind every [`sample_tenant`].
pub(crate) fn sample_owner_key() -> OwnerKey {
    OwnerKey::from_fixture("5a".repeat(32))
}

pub(crate) fn sample_tenant(subdomain: &str) -> Tenant {
    let signup = TenantSignup::new("Acme Biler", "owner@acme.dk", subdomain).expect("valid signup");
    Tenant::from_signup(
        signup,
        &sample_owner_key(),
        "lejio-fri.dk",
        30,
        fixture_timestamp(),
    )
}
