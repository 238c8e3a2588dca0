//! Page block HTTP handlers.
//!
//! ```text
//! POST   /api/AddPageBlock
//! PUT    /api/UpdatePageBlock
//! DELETE /api/DeletePageBlock?page_id=&block_id=
//! GET    /api/BlockTypes
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::{
    Block, BlockConfig, BlockConfigPatch, BlockDraft, BlockId, BlockKind, BlockPatch, Error,
    PageId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::authorize_page;
use crate::inbound::http::pages::{MessageResponse, parse_page_id};
use crate::inbound::http::schemas::{BlockSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field_error, require, require_uuid};

/// Request payload for adding a block.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AddBlockRequest {
    pub page_id: Option<String>,
    #[schema(example = "hero")]
    pub block_type: Option<String>,
    /// Defaults to the current number of blocks on the page.
    pub position: Option<u32>,
    /// Flat object of string, number, or boolean values.
    #[schema(value_type = Option<Object>)]
    pub config: Option<Value>,
}

/// Request payload for updating a block. Omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateBlockRequest {
    pub page_id: Option<String>,
    pub block_id: Option<String>,
    pub block_type: Option<String>,
    pub position: Option<u32>,
    /// Keys to overwrite; a `null` value removes the key.
    #[schema(value_type = Option<Object>)]
    pub config: Option<Value>,
}

/// Query parameters naming one block.
#[derive(Debug, Default, Deserialize)]
pub struct BlockIdQuery {
    pub page_id: Option<String>,
    pub block_id: Option<String>,
}

/// Catalogue entry for a recognised block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlockTypeResponse {
    #[schema(example = "vehicle-list")]
    pub block_type: String,
    #[schema(example = "Vehicle list")]
    pub label: String,
    /// Config keys the renderer reads.
    pub config_keys: Vec<String>,
}

fn parse_kind(raw: String) -> Result<BlockKind, Error> {
    BlockKind::parse(&raw).map_err(|err| invalid_field_error("block_type", err))
}

fn config_object(value: Option<Value>) -> Result<Option<Map<String, Value>>, Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(_) => Err(invalid_field_error("config", "must be a JSON object")),
    }
}

/// Positions are stored as PostgreSQL `integer`.
const MAX_POSITION: u32 = i32::MAX.unsigned_abs();

fn check_position(position: Option<u32>) -> Result<Option<u32>, Error> {
    match position {
        Some(value) if value > MAX_POSITION => Err(invalid_field_error(
            "position",
            format!("must be at most {MAX_POSITION}"),
        )),
        other => Ok(other),
    }
}

fn parse_block_id(value: Option<String>) -> Result<BlockId, Error> {
    require_uuid(value, "block_id").map(BlockId::from_uuid)
}

fn parse_add_request(payload: AddBlockRequest) -> Result<(PageId, BlockDraft), Error> {
    let page_id = parse_page_id(payload.page_id)?;
    let block_type = parse_kind(require(payload.block_type, "block_type")?)?;
    let position = check_position(payload.position)?;
    let config = config_object(payload.config)?
        .map(BlockConfig::from_json)
        .transpose()
        .map_err(|err| invalid_field_error("config", err))?
        .unwrap_or_default();
    Ok((
        page_id,
        BlockDraft {
            block_type,
            position,
            config,
        },
    ))
}

fn parse_update_request(
    payload: UpdateBlockRequest,
) -> Result<(PageId, BlockId, BlockPatch), Error> {
    let page_id = parse_page_id(payload.page_id)?;
    let block_id = parse_block_id(payload.block_id)?;
    let config = config_object(payload.config)?
        .map(BlockConfigPatch::from_json)
        .transpose()
        .map_err(|err| invalid_field_error("config", err))?;
    let patch = BlockPatch {
        block_type: payload.block_type.map(parse_kind).transpose()?,
        position: check_position(payload.position)?,
        config,
    };
    Ok((page_id, block_id, patch))
}

/// Add a block to a page.
#[utoipa::path(
    post,
    path = "/api/AddPageBlock",
    request_body = AddBlockRequest,
    responses(
        (status = 201, description = "Block created", body = BlockSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page not found", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "addPageBlock"
)]
#[post("/AddPageBlock")]
pub async fn add_block(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<AddBlockRequest>,
) -> ApiResult<HttpResponse> {
    let (page_id, draft) = parse_add_request(payload.into_inner())?;
    authorize_page(&state, &req, page_id).await?;
    let block = state.pages.add_block(page_id, draft).await?;
    Ok(HttpResponse::Created().json(block))
}

/// Merge supplied fields into a block.
#[utoipa::path(
    put,
    path = "/api/UpdatePageBlock",
    request_body = UpdateBlockRequest,
    responses(
        (status = 200, description = "Updated block", body = BlockSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page or block not found", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "updatePageBlock"
)]
#[put("/UpdatePageBlock")]
pub async fn update_block(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UpdateBlockRequest>,
) -> ApiResult<web::Json<Block>> {
    let (page_id, block_id, patch) = parse_update_request(payload.into_inner())?;
    authorize_page(&state, &req, page_id).await?;
    let block = state.pages.update_block(page_id, block_id, patch).await?;
    Ok(web::Json(block))
}

/// Remove a block from a page.
#[utoipa::path(
    delete,
    path = "/api/DeletePageBlock",
    params(
        ("page_id" = String, Query, description = "Page holding the block"),
        ("block_id" = String, Query, description = "Block to delete")
    ),
    responses(
        (status = 200, description = "Block deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Page or block not found", body = ErrorSchema)
    ),
    tags = ["blocks"],
    operation_id = "deletePageBlock"
)]
#[delete("/DeletePageBlock")]
pub async fn delete_block(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<BlockIdQuery>,
) -> ApiResult<web::Json<MessageResponse>> {
    let BlockIdQuery { page_id, block_id } = query.into_inner();
    let page_id = parse_page_id(page_id)?;
    let block_id = parse_block_id(block_id)?;
    authorize_page(&state, &req, page_id).await?;
    state.pages.delete_block(page_id, block_id).await?;
    Ok(web::Json(MessageResponse::new("Block deleted")))
}

/// List the recognised block types.
#[utoipa::path(
    get,
    path = "/api/BlockTypes",
    responses((status = 200, description = "Block type catalogue", body = [BlockTypeResponse])),
    tags = ["blocks"],
    operation_id = "blockTypes"
)]
#[get("/BlockTypes")]
pub async fn block_types() -> web::Json<Vec<BlockTypeResponse>> {
    web::Json(block_catalogue())
}

fn block_catalogue() -> Vec<BlockTypeResponse> {
    BlockKind::KNOWN
        .iter()
        .map(|kind| BlockTypeResponse {
            block_type: kind.as_str().to_owned(),
            label: kind.label().unwrap_or_default().to_owned(),
            config_keys: kind
                .config_keys()
                .iter()
                .map(|key| (*key).to_owned())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigValue, ErrorCode};
    use rstest::rstest;
    use serde_json::json;

    fn page_id() -> String {
        uuid::Uuid::nil().to_string()
    }

    #[rstest]
    fn add_request_defaults_config_and_position() {
        let payload = AddBlockRequest {
            page_id: Some(page_id()),
            block_type: Some("hero".to_owned()),
            ..AddBlockRequest::default()
        };

        let (_, draft) = parse_add_request(payload).expect("valid block");

        assert_eq!(draft.block_type, BlockKind::Hero);
        assert_eq!(draft.position, None);
        assert!(draft.config.is_empty());
    }

    #[rstest]
    #[case(json!(["not", "an", "object"]))]
    #[case(json!({"nested": {"too": "deep"}}))]
    fn add_request_rejects_unsupported_config(#[case] config: Value) {
        let payload = AddBlockRequest {
            page_id: Some(page_id()),
            block_type: Some("text".to_owned()),
            position: None,
            config: Some(config),
        };

        let err = parse_add_request(payload).expect_err("bad config");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "config");
    }

    #[rstest]
    fn update_request_keeps_null_config_keys_as_removals() {
        let payload = UpdateBlockRequest {
            page_id: Some(page_id()),
            block_id: Some(uuid::Uuid::nil().to_string()),
            config: Some(json!({"headline": "Ny", "subheadline": null})),
            ..UpdateBlockRequest::default()
        };

        let (_, _, patch) = parse_update_request(payload).expect("valid patch");

        let mut config = BlockConfig::default();
        config.set("subheadline", ConfigValue::Text("Gammel".to_owned()));
        config.merge(patch.config.expect("config patch"));
        assert_eq!(config.text("headline").as_deref(), Some("Ny"));
        assert_eq!(config.get("subheadline"), None);
        assert_eq!(patch.block_type, None);
    }

    #[rstest]
    #[case(MAX_POSITION, true)]
    #[case(MAX_POSITION + 1, false)]
    #[case(u32::MAX, false)]
    fn positions_stop_at_the_storage_limit(#[case] position: u32, #[case] accepted: bool) {
        let add = AddBlockRequest {
            page_id: Some(page_id()),
            block_type: Some("text".to_owned()),
            position: Some(position),
            ..AddBlockRequest::default()
        };
        let update = UpdateBlockRequest {
            page_id: Some(page_id()),
            block_id: Some(uuid::Uuid::nil().to_string()),
            position: Some(position),
            ..UpdateBlockRequest::default()
        };

        let add_outcome = parse_add_request(add);
        let update_outcome = parse_update_request(update);

        assert_eq!(add_outcome.is_ok(), accepted);
        assert_eq!(update_outcome.is_ok(), accepted);
        if let Err(err) = add_outcome {
            assert_eq!(err.details().expect("details")["field"], "position");
        }
        assert_eq!(MAX_POSITION, 2_147_483_647);
    }

    #[rstest]
    fn catalogue_lists_every_known_type() {
        let catalogue = block_catalogue();

        assert_eq!(catalogue.len(), BlockKind::KNOWN.len());
        assert!(catalogue.iter().any(|entry| entry.block_type == "vehicle-list"));
        assert!(catalogue.iter().all(|entry| !entry.label.is_empty()));
    }
}
