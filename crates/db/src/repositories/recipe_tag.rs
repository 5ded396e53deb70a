//! Recipe tag repository.

use std::sync::Arc;

use crate::entities::{RecipeTag, Tag, recipe_tag, tag};
use foodgram_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Recipe tag repository for database operations.
#[derive(Clone)]
pub struct RecipeTagRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeTagRepository {
    /// Create a new recipe tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert tag rows for a recipe.
    pub async fn create_many(&self, models: Vec<recipe_tag::ActiveModel>) -> AppResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        RecipeTag::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete all tag rows of a recipe.
    pub async fn delete_by_recipe(&self, recipe_id: &str) -> AppResult<()> {
        RecipeTag::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get the tags of a recipe.
    pub async fn find_tags_by_recipe(&self, recipe_id: &str) -> AppResult<Vec<tag::Model>> {
        Ok(RecipeTag::find()
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .find_also_related(Tag)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .filter_map(|(_, tag)| tag)
            .collect())
    }

    /// Get recipe IDs carrying any of the given tags.
    pub async fn find_recipe_ids_by_tag_ids(&self, tag_ids: &[String]) -> AppResult<Vec<String>> {
        if tag_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut recipe_ids: Vec<String> = RecipeTag::find()
            .filter(recipe_tag::Column::TagId.is_in(tag_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|rt| rt.recipe_id)
            .collect();

        recipe_ids.sort_unstable();
        recipe_ids.dedup();
        Ok(recipe_ids)
    }
}
