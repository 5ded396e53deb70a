//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, favorite};
use foodgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a favorite by user and recipe.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<favorite::Model>> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a recipe is favorited by user.
    pub async fn is_favorited(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, recipe_id).await?.is_some())
    }

    /// Create a new favorite.
    ///
    /// A lost check-then-insert race is rejected by the unique
    /// (user, recipe) index and reported as `AlreadyExists`.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::AlreadyExists("favorite".to_string())
                }
                _ => AppError::Database(e.to_string()),
            })
    }

    /// Delete a favorite by pair.
    pub async fn delete_by_pair(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        Favorite::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get favorites by user (keyset paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        let mut query = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(favorite::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get recipe IDs favorited by a user.
    pub async fn find_recipe_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        Ok(Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|f| f.recipe_id)
            .collect())
    }

    /// Count favorites for a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_favorite(id: &str, user_id: &str, recipe_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_favorited() {
        let fav = create_test_favorite("fav1", "user1", "recipe1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav.clone()]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        assert!(repo.is_favorited("user1", "recipe1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_not_favorited() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        assert!(!repo.is_favorited("user1", "recipe1").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_recipe_ids_by_user() {
        let fav1 = create_test_favorite("fav1", "user1", "recipe1");
        let fav2 = create_test_favorite("fav2", "user1", "recipe2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav1, fav2]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let ids = repo.find_recipe_ids_by_user("user1").await.unwrap();

        assert_eq!(ids, vec!["recipe1".to_string(), "recipe2".to_string()]);
    }
}
