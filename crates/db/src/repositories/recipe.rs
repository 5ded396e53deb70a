//! Recipe repository.

use std::sync::Arc;

use crate::entities::{Recipe, recipe};
use foodgram_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Filters applied when listing recipes.
///
/// `id_in` narrows the result to an explicit set of recipe IDs; it is how
/// favorite and shopping-cart membership filters reach the query. An empty
/// set is a valid filter meaning "match nothing".
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub author_id: Option<String>,
    pub id_in: Option<Vec<String>>,
}

/// Recipe repository for database operations.
#[derive(Clone)]
pub struct RecipeRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepository {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a recipe by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<recipe::Model>> {
        Recipe::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a recipe by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<recipe::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    /// Find recipes by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<recipe::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Recipe::find()
            .filter(recipe::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new recipe.
    pub async fn create(&self, model: recipe::ActiveModel) -> AppResult<recipe::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a recipe.
    pub async fn update(&self, model: recipe::ActiveModel) -> AppResult<recipe::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a recipe (cascades to its ingredient and tag rows).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let recipe = self.get_by_id(id).await?;
        recipe
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List recipes (keyset paginated, newest first).
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<recipe::Model>> {
        if let Some(ids) = &filter.id_in {
            if ids.is_empty() {
                return Ok(vec![]);
            }
        }

        let mut query = Recipe::find()
            .order_by_desc(recipe::Column::Id)
            .limit(limit);

        if let Some(author_id) = &filter.author_id {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }
        if let Some(ids) = &filter.id_in {
            query = query.filter(recipe::Column::Id.is_in(ids.clone()));
        }
        if let Some(until) = until_id {
            query = query.filter(recipe::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an author's recipes, newest first, optionally limited.
    pub async fn find_by_author(
        &self,
        author_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<recipe::Model>> {
        let mut query = Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count an author's recipes.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Recipe::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
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

    fn create_test_recipe(id: &str, author_id: &str, name: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            name: name.to_string(),
            text: "Mix and cook.".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            cooking_time: 30,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let recipe = create_test_recipe("r1", "u1", "Pancakes");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe.clone()]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.find_by_id("r1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Pancakes");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::RecipeNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected RecipeNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_with_empty_id_set_short_circuits() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = RecipeRepository::new(db);
        let filter = RecipeFilter {
            id_in: Some(vec![]),
            ..Default::default()
        };
        let result = repo.list(&filter, 10, None).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let r1 = create_test_recipe("r1", "u1", "Pancakes");
        let r2 = create_test_recipe("r2", "u1", "Omelette");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r2, r1]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let filter = RecipeFilter {
            author_id: Some("u1".to_string()),
            ..Default::default()
        };
        let result = repo.list(&filter, 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.author_id == "u1"));
    }

    #[tokio::test]
    async fn test_find_by_author_with_limit() {
        let r1 = create_test_recipe("r1", "u1", "Pancakes");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.find_by_author("u1", Some(1)).await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
