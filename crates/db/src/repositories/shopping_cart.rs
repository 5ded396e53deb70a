//! Shopping cart repository.

use std::sync::Arc;

use crate::entities::{ShoppingCart, shopping_cart};
use foodgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    SqlErr,
};

/// Shopping cart repository for database operations.
#[derive(Clone)]
pub struct ShoppingCartRepository {
    db: Arc<DatabaseConnection>,
}

impl ShoppingCartRepository {
    /// Create a new shopping cart repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a cart entry by user and recipe.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<shopping_cart::Model>> {
        ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a recipe is in the user's cart.
    pub async fn is_in_cart(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, recipe_id).await?.is_some())
    }

    /// Create a new cart entry.
    ///
    /// A lost check-then-insert race is rejected by the unique
    /// (user, recipe) index and reported as `AlreadyExists`.
    pub async fn create(
        &self,
        model: shopping_cart::ActiveModel,
    ) -> AppResult<shopping_cart::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::AlreadyExists("shopping cart entry".to_string())
                }
                _ => AppError::Database(e.to_string()),
            })
    }

    /// Delete a cart entry by pair.
    pub async fn delete_by_pair(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        ShoppingCart::delete_many()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get recipe IDs in a user's cart.
    pub async fn find_recipe_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        Ok(ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|entry| entry.recipe_id)
            .collect())
    }

    /// Count cart entries for a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
