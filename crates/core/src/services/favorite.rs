//! Favorite service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{favorite, recipe},
    repositories::{FavoriteRepository, RecipeRepository},
};
use sea_orm::Set;

/// Favorite service for managing favorited recipes.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(favorite_repo: FavoriteRepository, recipe_repo: RecipeRepository) -> Self {
        Self {
            favorite_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a recipe to favorites. Returns the recipe for the response body.
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> AppResult<recipe::Model> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;

        if self.favorite_repo.is_favorited(user_id, recipe_id).await? {
            return Err(AppError::AlreadyExists("favorite".to_string()));
        }

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            recipe_id: Set(recipe_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.favorite_repo.create(model).await?;

        Ok(recipe)
    }

    /// Remove a recipe from favorites.
    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        if !self.favorite_repo.is_favorited(user_id, recipe_id).await? {
            return Err(AppError::NotFound("favorite".to_string()));
        }

        self.favorite_repo.delete_by_pair(user_id, recipe_id).await
    }

    /// Check if a recipe is favorited by user.
    pub async fn is_favorited(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        self.favorite_repo.is_favorited(user_id, recipe_id).await
    }

    /// Get recipe IDs favorited by a user.
    pub async fn favorited_recipe_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.favorite_repo.find_recipe_ids_by_user(user_id).await
    }
}
