//! Ingredient service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{ingredient, user},
    repositories::IngredientRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Cap on ingredient search results; reference data lists are unpaginated.
const MAX_RESULTS: u64 = 1000;

/// Input for creating an ingredient.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateIngredientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

/// Ingredient service for reference data.
#[derive(Clone)]
pub struct IngredientService {
    ingredient_repo: IngredientRepository,
    id_gen: IdGenerator,
}

impl IngredientService {
    /// Create a new ingredient service.
    #[must_use]
    pub const fn new(ingredient_repo: IngredientRepository) -> Self {
        Self {
            ingredient_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List ingredients, optionally filtered by a name prefix.
    pub async fn list(&self, name_prefix: Option<&str>) -> AppResult<Vec<ingredient::Model>> {
        self.ingredient_repo.list(name_prefix, MAX_RESULTS).await
    }

    /// Get an ingredient by ID.
    pub async fn get(&self, id: &str) -> AppResult<ingredient::Model> {
        self.ingredient_repo.get_by_id(id).await
    }

    /// Create an ingredient. Admin only.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateIngredientInput,
    ) -> AppResult<ingredient::Model> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may create ingredients".to_string(),
            ));
        }
        input.validate()?;

        let model = ingredient::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            measurement_unit: Set(input.measurement_unit),
        };

        self.ingredient_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foodgram_db::entities::user::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Cook".to_string(),
            role,
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = IngredientService::new(IngredientRepository::new(db));

        let actor = create_test_user("u1", Role::User);
        let result = service
            .create(
                &actor,
                CreateIngredientInput {
                    name: "Sugar".to_string(),
                    measurement_unit: "g".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let salt = ingredient::Model {
            id: "i1".to_string(),
            name: "Salt".to_string(),
            measurement_unit: "g".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[salt]])
                .into_connection(),
        );
        let service = IngredientService::new(IngredientRepository::new(db));

        let result = service.list(Some("sa")).await.unwrap();
        assert_eq!(result.len(), 1);
    }
}
