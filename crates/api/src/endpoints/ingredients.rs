//! Ingredient endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use foodgram_common::AppResult;
use foodgram_core::ingredient::CreateIngredientInput;
use foodgram_db::entities::ingredient;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Ingredient response.
#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(ingredient: ingredient::Model) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient search parameters.
#[derive(Debug, Deserialize)]
pub struct ListIngredientsQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// List ingredients, optionally filtered by name prefix.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListIngredientsQuery>,
) -> AppResult<ApiResponse<Vec<IngredientResponse>>> {
    let ingredients = state.ingredient_service.list(query.name.as_deref()).await?;

    Ok(ApiResponse::ok(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

/// Get an ingredient by ID.
async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<IngredientResponse>> {
    let ingredient = state.ingredient_service.get(&id).await?;

    Ok(ApiResponse::ok(IngredientResponse::from(ingredient)))
}

/// Create an ingredient. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<ApiResponse<IngredientResponse>> {
    let ingredient = state.ingredient_service.create(&user, input).await?;

    Ok(ApiResponse::ok(IngredientResponse::from(ingredient)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_ingredient))
}
