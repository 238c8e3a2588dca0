//! Public tenant site rendering.
//!
//! ```text
//! GET /api/RenderPage?slug=om-os&subdomain=acme
//! ```
//!
//! Without a `subdomain` parameter the tenant is taken from the request host.

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::{Error, HOME_SLUG, Slug, Tenant};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tenant_context::resolve_request_tenant;
use crate::inbound::http::validation::invalid_field_error;

/// Query parameters for page rendering.
#[derive(Debug, Default, Deserialize)]
pub struct RenderPageQuery {
    pub slug: Option<String>,
    pub subdomain: Option<String>,
}

fn parse_slug(value: Option<String>) -> Result<Slug, Error> {
    let raw = value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| HOME_SLUG.to_owned());
    Slug::new(raw).map_err(|err| invalid_field_error("slug", err))
}

async fn target_tenant(
    state: &HttpState,
    req: &HttpRequest,
    subdomain: Option<String>,
) -> Result<Tenant, Error> {
    if let Some(subdomain) = subdomain.filter(|raw| !raw.trim().is_empty()) {
        return state
            .tenants
            .by_subdomain(&subdomain.trim().to_ascii_lowercase())
            .await;
    }
    resolve_request_tenant(state, req)
        .await?
        .tenant
        .ok_or_else(|| Error::not_found("No tenant addressed by this request"))
}

/// Render a published page as a standalone HTML document.
#[utoipa::path(
    get,
    path = "/api/RenderPage",
    params(
        ("slug" = Option<String>, Query, description = "Page slug, defaults to home"),
        ("subdomain" = Option<String>, Query, description = "Tenant subdomain, defaults to the request host")
    ),
    responses(
        (status = 200, description = "Rendered page", content_type = "text/html", body = String),
        (status = 400, description = "Malformed slug", body = ErrorSchema),
        (status = 404, description = "Tenant or published page not found", body = ErrorSchema)
    ),
    tags = ["site"],
    operation_id = "renderPage",
    security([])
)]
#[get("/RenderPage")]
pub async fn render_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<RenderPageQuery>,
) -> ApiResult<HttpResponse> {
    let RenderPageQuery { slug, subdomain } = query.into_inner();
    let slug = parse_slug(slug)?;
    let tenant = target_tenant(&state, &req, subdomain).await?;
    let html = state.site.render(&tenant, &slug).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, HOME_SLUG)]
    #[case(Some("  ".to_owned()), HOME_SLUG)]
    #[case(Some(" om-os ".to_owned()), "om-os")]
    fn slug_defaults_to_home(#[case] value: Option<String>, #[case] expected: &str) {
        assert_eq!(parse_slug(value).expect("slug").as_str(), expected);
    }

    #[rstest]
    fn malformed_slug_is_rejected() {
        let err = parse_slug(Some("Om Os".to_owned())).expect_err("bad slug");

        assert_eq!(err.details().expect("details")["field"], "slug");
    }
}
