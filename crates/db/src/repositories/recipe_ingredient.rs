//! Recipe ingredient repository.

use std::sync::Arc;

use crate::entities::{Ingredient, RecipeIngredient, ingredient, recipe_ingredient};
use foodgram_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Recipe ingredient repository for database operations.
#[derive(Clone)]
pub struct RecipeIngredientRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeIngredientRepository {
    /// Create a new recipe ingredient repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert ingredient rows for a recipe.
    pub async fn create_many(
        &self,
        models: Vec<recipe_ingredient::ActiveModel>,
    ) -> AppResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        RecipeIngredient::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete all ingredient rows of a recipe.
    pub async fn delete_by_recipe(&self, recipe_id: &str) -> AppResult<()> {
        RecipeIngredient::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get the ingredient rows of a recipe.
    pub async fn find_by_recipe(
        &self,
        recipe_id: &str,
    ) -> AppResult<Vec<recipe_ingredient::Model>> {
        RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get ingredient rows joined with their ingredient for a recipe.
    pub async fn find_with_ingredient_by_recipe(
        &self,
        recipe_id: &str,
    ) -> AppResult<Vec<(recipe_ingredient::Model, Option<ingredient::Model>)>> {
        RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .find_also_related(Ingredient)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get ingredient rows joined with their ingredient across recipes.
    ///
    /// This is the query behind shopping-list aggregation: one joined row
    /// per (recipe, ingredient) pairing in the given set.
    pub async fn find_with_ingredient_by_recipe_ids(
        &self,
        recipe_ids: &[String],
    ) -> AppResult<Vec<(recipe_ingredient::Model, Option<ingredient::Model>)>> {
        if recipe_ids.is_empty() {
            return Ok(vec![]);
        }

        RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.to_vec()))
            .find_also_related(Ingredient)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
