//! Recipe endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use foodgram_common::AppResult;
use foodgram_core::recipe::{RecipeDetail, RecipeInput, RecipeListQuery};
use foodgram_db::entities::recipe;
use serde::{Deserialize, Serialize};

use super::ingredients::IngredientResponse;
use super::tags::TagResponse;
use super::users::UserResponse;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Short recipe view used by favorite/cart responses and subscriptions.
#[derive(Serialize)]
pub struct RecipeSummaryResponse {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<recipe::Model> for RecipeSummaryResponse {
    fn from(recipe: recipe::Model) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// One ingredient line in the nested recipe view.
#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    #[serde(flatten)]
    pub ingredient: IngredientResponse,
    pub amount: i32,
}

/// Nested recipe view.
#[derive(Serialize)]
pub struct RecipeDetailResponse {
    pub id: String,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: String,
}

impl From<RecipeDetail> for RecipeDetailResponse {
    fn from(detail: RecipeDetail) -> Self {
        Self {
            id: detail.recipe.id,
            author: UserResponse::from_model(detail.author, detail.author_is_subscribed),
            name: detail.recipe.name,
            text: detail.recipe.text,
            image: detail.recipe.image,
            cooking_time: detail.recipe.cooking_time,
            tags: detail.tags.into_iter().map(TagResponse::from).collect(),
            ingredients: detail
                .ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    ingredient: IngredientResponse::from(line.ingredient),
                    amount: line.amount,
                })
                .collect(),
            is_favorited: detail.is_favorited,
            is_in_shopping_cart: detail.is_in_shopping_cart,
            created_at: detail.recipe.created_at.to_rfc3339(),
        }
    }
}

/// Recipe list parameters.
#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    pub author: Option<String>,
    /// Comma-separated tag slugs.
    pub tags: Option<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}

/// List recipes with filters.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListRecipesQuery>,
) -> AppResult<ApiResponse<Vec<RecipeDetailResponse>>> {
    let tag_slugs = query
        .tags
        .as_deref()
        .map(|slugs| {
            slugs
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let list_query = RecipeListQuery {
        author_id: query.author.clone(),
        tag_slugs,
        is_favorited: flag(query.is_favorited.as_deref()),
        is_in_shopping_cart: flag(query.is_in_shopping_cart.as_deref()),
        limit: query.limit.min(100),
        until_id: query.until_id.clone(),
    };

    let details = state
        .recipe_service
        .list(&list_query, viewer.as_ref())
        .await?;

    Ok(ApiResponse::ok(
        details.into_iter().map(RecipeDetailResponse::from).collect(),
    ))
}

/// Create a recipe.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RecipeInput>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    let detail = state.recipe_service.create(&user, input).await?;

    Ok(ApiResponse::ok(RecipeDetailResponse::from(detail)))
}

/// Get a recipe by ID.
async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    let detail = state.recipe_service.get_detail(&id, viewer.as_ref()).await?;

    Ok(ApiResponse::ok(RecipeDetailResponse::from(detail)))
}

/// Fully replace a recipe. Author or admin only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    let detail = state.recipe_service.update(&user, &id, input).await?;

    Ok(ApiResponse::ok(RecipeDetailResponse::from(detail)))
}

/// Delete a recipe. Author or admin only.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.recipe_service.delete(&user, &id).await?;

    Ok(no_content())
}

/// Add a recipe to favorites.
async fn favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeSummaryResponse>> {
    let recipe = state.favorite_service.add(&user.id, &id).await?;

    Ok(ApiResponse::ok(RecipeSummaryResponse::from(recipe)))
}

/// Remove a recipe from favorites.
async fn unfavorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.favorite_service.remove(&user.id, &id).await?;

    Ok(no_content())
}

/// Add a recipe to the shopping cart.
async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeSummaryResponse>> {
    let recipe = state.shopping_cart_service.add(&user.id, &id).await?;

    Ok(ApiResponse::ok(RecipeSummaryResponse::from(recipe)))
}

/// Remove a recipe from the shopping cart.
async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.shopping_cart_service.remove(&user.id, &id).await?;

    Ok(no_content())
}

/// Download the aggregated shopping list as a text attachment.
async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let text = state
        .shopping_cart_service
        .build_shopping_list(&user.id)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        text,
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route("/{id}", get(get_recipe).patch(update).delete(delete))
        .route("/{id}/favorite", post(favorite).delete(unfavorite))
        .route("/{id}/shopping_cart", post(add_to_cart).delete(remove_from_cart))
}
