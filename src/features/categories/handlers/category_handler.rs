use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, CurrentRequestId};
use crate::features::categories::dtos::{CategoryDataDto, CategoryResponseDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// Get category by UUID
#[utoipa::path(
    get,
    path = "/api/categories/{uuid}",
    params(
        ("uuid" = Uuid, Path, description = "Category UUID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Malformed UUID"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_uuid(uuid).await?;
    Ok(Json(ApiResponse::success(Some(category.into()), None, None)))
}

/// Update a category and its description
///
/// Only the supplied fields are written. `status` is always required.
#[utoipa::path(
    put,
    path = "/api/admin/categories/{uuid}",
    params(
        ("uuid" = Uuid, Path, description = "Category UUID")
    ),
    request_body = CategoryDataDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 404, description = "Category not found")
    ),
    security(
        ("basic_auth" = [])
    ),
    tag = "admin"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(uuid): Path<Uuid>,
    CurrentRequestId(request_id): CurrentRequestId,
    AppJson(payload): AppJson<Value>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let context = json!({ "request_id": request_id });
    let category = service.update(uuid, payload, Some(context)).await?;

    Ok(Json(ApiResponse::success(
        Some(category.into()),
        Some("Category updated successfully".to_string()),
        None,
    )))
}
