//! Builders wiring repositories into domain services and HTTP state.

use std::io;
use std::path::Path;
use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{
    AccessTokens, PageRepository, RecordRepository, TenantDirectory, TenantRepository,
};
use crate::domain::{
    AccessService, Booking, Invoice, PageService, TenantRecord, TenantRecordService,
    TenantService, Vehicle,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::file_store::JsonFilePageRepository;
use crate::outbound::memory::{
    InMemoryPageRepository, InMemoryRecordRepository, InMemoryTenantRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselInvoiceRepository, DieselPageRepository,
    DieselTenantRepository, DieselVehicleRepository,
};
use crate::outbound::tokens::JwtAccessTokens;

use super::ServerConfig;

/// Storage adapters backing every domain service.
#[derive(Clone)]
pub struct Repositories {
    pub pages: Arc<dyn PageRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub vehicles: Arc<dyn RecordRepository<Vehicle>>,
    pub bookings: Arc<dyn RecordRepository<Booking>>,
    pub invoices: Arc<dyn RecordRepository<Invoice>>,
}

impl Repositories {
    /// Process-local maps; nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::with_pages(Arc::new(InMemoryPageRepository::default()))
    }

    /// Pages persisted as JSON under `data_dir`; other records stay in memory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while creating or opening the directory.
    pub fn json_files(data_dir: &Path) -> io::Result<Self> {
        let pages = JsonFilePageRepository::open(data_dir)?;
        Ok(Self::with_pages(Arc::new(pages)))
    }

    /// Everything stored in PostgreSQL through `pool`.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            pages: Arc::new(DieselPageRepository::new(pool.clone())),
            tenants: Arc::new(DieselTenantRepository::new(pool.clone())),
            vehicles: Arc::new(DieselVehicleRepository::new(pool.clone())),
            bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            invoices: Arc::new(DieselInvoiceRepository::new(pool.clone())),
        }
    }

    fn with_pages(pages: Arc<dyn PageRepository>) -> Self {
        Self {
            pages,
            tenants: Arc::new(InMemoryTenantRepository::default()),
            vehicles: Arc::new(InMemoryRecordRepository::<Vehicle>::default()),
            bookings: Arc::new(InMemoryRecordRepository::<Booking>::default()),
            invoices: Arc::new(InMemoryRecordRepository::<Invoice>::default()),
        }
    }
}

fn record_service<R: TenantRecord>(
    records: Arc<dyn RecordRepository<R>>,
    clock: &Arc<dyn Clock>,
) -> Arc<TenantRecordService<R, dyn RecordRepository<R>>> {
    Arc::new(TenantRecordService::new(records, clock.clone()))
}

fn build_access(
    config: &ServerConfig,
    tenants: Arc<dyn TenantDirectory>,
    clock: Arc<dyn Clock>,
) -> Arc<AccessService> {
    let (tokens, enforce): (Arc<dyn AccessTokens>, bool) = match &config.token_secret {
        Some(secret) => (Arc::new(JwtAccessTokens::new(secret)), true),
        None => {
            warn!("no token secret configured; bearer tokens are not checked");
            (Arc::new(JwtAccessTokens::ephemeral()), false)
        }
    };
    Arc::new(AccessService::new(
        tenants,
        tokens,
        clock,
        config.token_ttl,
        enforce,
    ))
}

/// Build the shared HTTP state from the configured repositories.
pub fn build_http_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    let repos = config.repositories.clone();
    let pages = Arc::new(PageService::new(repos.pages, clock.clone()));
    let tenants: Arc<dyn TenantDirectory> = Arc::new(TenantService::new(
        repos.tenants,
        clock.clone(),
        config.root_domain.clone(),
        config.trial_days,
    ));
    let access = build_access(config, tenants.clone(), clock.clone());
    let ports = HttpStatePorts {
        pages: pages.clone(),
        pages_query: pages,
        tenants,
        access,
        vehicles: record_service(repos.vehicles, &clock),
        bookings: record_service(repos.bookings, &clock),
        invoices: record_service(repos.invoices, &clock),
    };
    HttpState::new(ports, config.root_domain.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, TenantId, TenantRegistration, TenantSignup};
    use mockable::DefaultClock;
    use std::net::{Ipv4Addr, SocketAddr};

    fn config(secret: Option<&[u8]>) -> ServerConfig {
        ServerConfig::new(
            SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            Repositories::in_memory(),
        )
        .with_token_secret(secret)
    }

    #[tokio::test]
    async fn tokens_are_optional_without_secret() {
        let state = build_http_state(&config(None), Arc::new(DefaultClock));
        let tenant = TenantId::new("tenant-a").expect("tenant id");

        assert!(state.access.authorize(None, &tenant).is_ok());
    }

    #[tokio::test]
    async fn secret_enables_token_checks() {
        let state = build_http_state(&config(Some(b"shh")), Arc::new(DefaultClock));
        let TenantRegistration { tenant, owner_key } = state
            .tenants
            .signup(TenantSignup::new("Acme Biler", "owner@acme.dk", "acme").expect("signup"))
            .await
            .expect("tenant");

        let denied = state
            .access
            .authorize(None, &tenant.id)
            .expect_err("missing token");
        let issued = state
            .access
            .issue_token(&tenant.id, "owner@acme.dk", owner_key.as_str())
            .await
            .expect("token");

        assert_eq!(denied.code(), ErrorCode::Unauthorized);
        assert!(state.access.authorize(Some(&issued.token), &tenant.id).is_ok());
    }

    #[test]
    fn json_file_repositories_create_the_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().join("nested").join("data");

        Repositories::json_files(&data_dir).expect("repositories");

        assert!(data_dir.is_dir());
    }
}
