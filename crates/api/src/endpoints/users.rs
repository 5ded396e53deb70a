//! User and subscription endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use foodgram_common::AppResult;
use foodgram_core::{
    follow::SubscriptionView,
    user::{CreateUserInput, SetPasswordInput},
};
use foodgram_db::entities::user;
use serde::{Deserialize, Serialize};

use super::recipes::RecipeSummaryResponse;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Public user profile.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserResponse {
    pub(crate) fn from_model(user: user::Model, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// A followed author with their recipes.
#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            user: UserResponse::from_model(view.author, true),
            recipes: view
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: view.recipes_count,
        }
    }
}

/// List users request.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Subscriptions request.
#[derive(Debug, Deserialize)]
pub struct SubscriptionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
    pub recipes_limit: Option<u64>,
}

/// Subscribe request parameters.
#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u64>,
}

const fn default_limit() -> u64 {
    10
}

/// Register a new user.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.create(input).await?;

    Ok(ApiResponse::ok(UserResponse::from_model(user, false)))
}

/// List users.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = query.limit.min(100);
    let users = state
        .user_service
        .list(limit, query.until_id.as_deref())
        .await?;

    let mut results = Vec::with_capacity(users.len());
    for user in users {
        let is_subscribed = match &viewer {
            Some(viewer) => {
                state
                    .follow_service
                    .is_subscribed(&viewer.id, &user.id)
                    .await?
            }
            None => false,
        };
        results.push(UserResponse::from_model(user, is_subscribed));
    }

    Ok(ApiResponse::ok(results))
}

/// Get the authenticated user's profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse::from_model(user, false))
}

/// Get a user by ID.
async fn get_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;

    let is_subscribed = match &viewer {
        Some(viewer) => {
            state
                .follow_service
                .is_subscribed(&viewer.id, &user.id)
                .await?
        }
        None => false,
    };

    Ok(ApiResponse::ok(UserResponse::from_model(
        user,
        is_subscribed,
    )))
}

/// Change the authenticated user's password.
async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetPasswordInput>,
) -> AppResult<StatusCode> {
    state.user_service.set_password(&user.id, input).await?;

    Ok(no_content())
}

/// List the authors the authenticated user is subscribed to.
async fn subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionsQuery>,
) -> AppResult<ApiResponse<Vec<SubscriptionResponse>>> {
    let limit = query.limit.min(100);
    let views = state
        .follow_service
        .subscriptions(
            &user.id,
            limit,
            query.until_id.as_deref(),
            query.recipes_limit,
        )
        .await?;

    Ok(ApiResponse::ok(
        views.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

/// Subscribe to an author.
async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SubscribeQuery>,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    let view = state
        .follow_service
        .subscribe(&user.id, &id, query.recipes_limit)
        .await?;

    Ok(ApiResponse::ok(SubscriptionResponse::from(view)))
}

/// Unsubscribe from an author.
async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.follow_service.unsubscribe(&user.id, &id).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(signup).get(list))
        .route("/me", get(me))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(subscriptions))
        .route("/{id}", get(get_user))
        .route("/{id}/subscribe", post(subscribe).delete(unsubscribe))
}
