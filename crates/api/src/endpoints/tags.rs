//! Tag endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use foodgram_common::AppResult;
use foodgram_core::tag::CreateTagInput;
use foodgram_db::entities::tag;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Tag response.
#[derive(Serialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<tag::Model> for TagResponse {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

/// List all tags.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<TagResponse>>> {
    let tags = state.tag_service.list().await?;

    Ok(ApiResponse::ok(
        tags.into_iter().map(TagResponse::from).collect(),
    ))
}

/// Get a tag by ID.
async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TagResponse>> {
    let tag = state.tag_service.get(&id).await?;

    Ok(ApiResponse::ok(TagResponse::from(tag)))
}

/// Create a tag. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> AppResult<ApiResponse<TagResponse>> {
    let tag = state.tag_service.create(&user, input).await?;

    Ok(ApiResponse::ok(TagResponse::from(tag)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_tag))
}
