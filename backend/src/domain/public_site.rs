//! Public tenant site rendering.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{PageQuery, TenantRecords};
use crate::domain::render::{RenderContext, render_document};
use crate::domain::{Error, Slug, Tenant, Vehicle};

/// Slug rendered when a visitor asks for the site root.
pub const HOME_SLUG: &str = "home";

/// Renders published pages for a lessor's public site.
#[derive(Clone)]
pub struct PublicSite {
    pages: Arc<dyn PageQuery>,
    vehicles: Arc<dyn TenantRecords<Vehicle>>,
}

impl PublicSite {
    /// Create a renderer over the page and vehicle use-cases.
    pub fn new(pages: Arc<dyn PageQuery>, vehicles: Arc<dyn TenantRecords<Vehicle>>) -> Self {
        Self { pages, vehicles }
    }

    /// Render the published page `slug` for `tenant` as an HTML document.
    pub async fn render(&self, tenant: &Tenant, slug: &Slug) -> Result<String, Error> {
        let page = self.pages.published_page(&tenant.id, slug).await?;
        let vehicles = self.vehicles.list(&tenant.id).await?;
        debug!(
            tenant_id = %tenant.id,
            page_id = %page.id,
            vehicles = vehicles.len(),
            "rendering public page"
        );
        let context = RenderContext {
            lessor: Some(tenant),
            vehicles: &vehicles,
        };
        Ok(render_document(&page, &context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPageRepository;
    use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp, page_draft, sample_tenant};
    use crate::domain::{
        BlockConfig, BlockDraft, BlockKind, ErrorCode, Page, PageService, TenantId,
        TenantRecord, VehicleDraft,
    };
    use async_trait::async_trait;
    use uuid::Uuid;

    struct FixedVehicles(Vec<Vehicle>);

    #[async_trait]
    impl TenantRecords<Vehicle> for FixedVehicles {
        async fn create(&self, _: &TenantId, _: VehicleDraft) -> Result<Vehicle, Error> {
            Err(Error::internal("not used"))
        }

        async fn list(&self, _: &TenantId) -> Result<Vec<Vehicle>, Error> {
            Ok(self.0.clone())
        }

        async fn get(&self, _: &TenantId, _: Uuid) -> Result<Vehicle, Error> {
            Err(Error::internal("not used"))
        }

        async fn update(
            &self,
            _: &TenantId,
            _: Uuid,
            _: crate::domain::VehiclePatch,
        ) -> Result<Vehicle, Error> {
            Err(Error::internal("not used"))
        }

        async fn delete(&self, _: &TenantId, _: Uuid) -> Result<(), Error> {
            Err(Error::internal("not used"))
        }
    }

    fn site(page: Option<Page>, vehicles: Vec<Vehicle>) -> PublicSite {
        let mut repo = MockPageRepository::new();
        repo.expect_find_by_slug().return_once(move |_, _| Ok(page));
        let pages = PageService::new(Arc::new(repo), fixture_clock());
        PublicSite::new(Arc::new(pages), Arc::new(FixedVehicles(vehicles)))
    }

    fn home() -> Slug {
        Slug::new(HOME_SLUG).expect("slug")
    }

    #[tokio::test]
    async fn renders_published_page_with_fleet() {
        let tenant = sample_tenant("acme");
        let mut page = Page::new(page_draft(tenant.id.as_str(), HOME_SLUG), fixture_timestamp());
        page.add_block(
            BlockDraft {
                block_type: BlockKind::VehicleList,
                position: None,
                config: BlockConfig::default(),
            },
            fixture_timestamp(),
        );
        page.publish(fixture_timestamp());
        let vehicle = Vehicle::create(
            tenant.id.clone(),
            VehicleDraft {
                make: "Volvo".to_owned(),
                model: "XC40".to_owned(),
                license_plate: "CD 98 765".to_owned(),
                ..VehicleDraft::default()
            },
            fixture_timestamp(),
        )
        .expect("vehicle");

        let html = site(Some(page), vec![vehicle])
            .render(&tenant, &home())
            .await
            .expect("rendered");

        assert!(html.contains("Volvo XC40"));
        assert!(html.contains("Acme Biler"));
    }

    #[tokio::test]
    async fn unpublished_page_is_not_found() {
        let tenant = sample_tenant("acme");
        let page = Page::new(page_draft(tenant.id.as_str(), HOME_SLUG), fixture_timestamp());

        let error = site(Some(page), Vec::new())
            .render(&tenant, &home())
            .await
            .expect_err("draft");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
