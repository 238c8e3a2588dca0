//! Page builder HTTP handlers.
//!
//! ```text
//! POST   /api/CreatePage
//! GET    /api/GetPages?tenant_id=&page_id=
//! PUT    /api/UpdatePage
//! POST   /api/PublishPage?page_id=
//! DELETE /api/DeletePage?page_id=
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Page, PageDraft, PageId, PagePatch, PageTitle, Slug};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::{authorize_page, authorize_tenant};
use crate::inbound::http::schemas::{ErrorSchema, PageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_field_error, parse_uuid, require, require_tenant_id, require_uuid,
};

/// Confirmation body for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Page deleted")]
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request payload for creating a page.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreatePageRequest {
    pub tenant_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub meta_description: Option<String>,
}

/// Request payload for updating a page. Omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePageRequest {
    pub page_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
}

/// Query parameters for listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct GetPagesQuery {
    pub tenant_id: Option<String>,
    pub page_id: Option<String>,
}

/// Query parameters naming one page.
#[derive(Debug, Default, Deserialize)]
pub struct PageIdQuery {
    pub page_id: Option<String>,
}

pub(crate) fn parse_page_id(value: Option<String>) -> Result<PageId, crate::domain::Error> {
    require_uuid(value, "page_id").map(PageId::from_uuid)
}

fn parse_title(raw: String) -> Result<PageTitle, crate::domain::Error> {
    PageTitle::new(raw).map_err(|err| invalid_field_error("title", err))
}

fn parse_slug(raw: String) -> Result<Slug, crate::domain::Error> {
    Slug::new(raw.trim()).map_err(|err| invalid_field_error("slug", err))
}

fn parse_create_request(payload: CreatePageRequest) -> Result<PageDraft, crate::domain::Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let title = parse_title(require(payload.title, "title")?)?;
    let slug = parse_slug(require(payload.slug, "slug")?)?;
    Ok(PageDraft {
        tenant_id,
        title,
        slug,
        meta_description: payload.meta_description,
    })
}

fn parse_update_request(
    payload: UpdatePageRequest,
) -> Result<(PageId, PagePatch), crate::domain::Error> {
    let page_id = parse_page_id(payload.page_id)?;
    let patch = PagePatch {
        title: payload.title.map(parse_title).transpose()?,
        slug: payload.slug.map(parse_slug).transpose()?,
        meta_description: payload.meta_description,
        is_published: payload.is_published,
    };
    Ok((page_id, patch))
}

/// Create a page for a tenant.
#[utoipa::path(
    post,
    path = "/api/CreatePage",
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Page created", body = PageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Token is for another tenant", body = ErrorSchema),
        (status = 409, description = "Slug already used by this tenant", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "createPage"
)]
#[post("/CreatePage")]
pub async fn create_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreatePageRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &draft.tenant_id)?;
    let page = state.pages.create_page(draft).await?;
    Ok(HttpResponse::Created().json(page))
}

/// List a tenant's pages, newest first.
#[utoipa::path(
    get,
    path = "/api/GetPages",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("page_id" = Option<String>, Query, description = "Narrow the list to one page")
    ),
    responses(
        (status = 200, description = "Pages", body = [PageSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "getPages"
)]
#[get("/GetPages")]
pub async fn get_pages(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<GetPagesQuery>,
) -> ApiResult<web::Json<Vec<Page>>> {
    let GetPagesQuery { tenant_id, page_id } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let page_id = page_id
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_uuid(&raw, "page_id").map(PageId::from_uuid))
        .transpose()?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let pages = state.pages_query.list_pages(&tenant_id, page_id).await?;
    Ok(web::Json(pages))
}

/// Merge supplied fields into a page.
#[utoipa::path(
    put,
    path = "/api/UpdatePage",
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Updated page", body = PageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page not found", body = ErrorSchema),
        (status = 409, description = "Slug already used by this tenant", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "updatePage"
)]
#[put("/UpdatePage")]
pub async fn update_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UpdatePageRequest>,
) -> ApiResult<web::Json<Page>> {
    let (page_id, patch) = parse_update_request(payload.into_inner())?;
    authorize_page(&state, &req, page_id).await?;
    let page = state.pages.update_page(page_id, patch).await?;
    Ok(web::Json(page))
}

/// Publish a page on the tenant's public site.
#[utoipa::path(
    post,
    path = "/api/PublishPage",
    params(("page_id" = String, Query, description = "Page to publish")),
    responses(
        (status = 200, description = "Published page", body = PageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page not found", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "publishPage"
)]
#[post("/PublishPage")]
pub async fn publish_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<PageIdQuery>,
) -> ApiResult<web::Json<Page>> {
    let page_id = parse_page_id(query.into_inner().page_id)?;
    authorize_page(&state, &req, page_id).await?;
    let page = state.pages.publish_page(page_id).await?;
    Ok(web::Json(page))
}

/// Delete a page and all of its blocks.
#[utoipa::path(
    delete,
    path = "/api/DeletePage",
    params(("page_id" = String, Query, description = "Page to delete")),
    responses(
        (status = 200, description = "Page deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page not found", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "deletePage"
)]
#[delete("/DeletePage")]
pub async fn delete_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<PageIdQuery>,
) -> ApiResult<web::Json<MessageResponse>> {
    let page_id = parse_page_id(query.into_inner().page_id)?;
    authorize_page(&state, &req, page_id).await?;
    state.pages.delete_page(page_id).await?;
    Ok(web::Json(MessageResponse::new("Page deleted")))
}
