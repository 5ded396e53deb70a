//! Recipe service.

use std::collections::HashSet;

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{ingredient, recipe, recipe_ingredient, recipe_tag, tag, user},
    repositories::{
        FavoriteRepository, FollowRepository, IngredientRepository, RecipeFilter,
        RecipeIngredientRepository, RecipeRepository, RecipeTagRepository, ShoppingCartRepository,
        TagRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One ingredient line in a recipe payload.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct IngredientAmountInput {
    pub id: String,

    #[validate(range(min = 1))]
    pub amount: i32,
}

/// Payload for creating or fully replacing a recipe.
///
/// Update is a full replace: `ingredients` and `tags` are required and
/// existing associations are rebuilt from the payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[validate(length(min = 1))]
    pub image: String,

    #[validate(range(min = 1))]
    pub cooking_time: i32,

    #[validate(length(min = 1), nested)]
    pub ingredients: Vec<IngredientAmountInput>,

    #[validate(length(min = 1))]
    pub tags: Vec<String>,
}

/// One ingredient line in the nested recipe view.
#[derive(Debug, Clone)]
pub struct RecipeIngredientView {
    pub ingredient: ingredient::Model,
    pub amount: i32,
}

/// Nested recipe view with author, tags, ingredients and viewer flags.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: recipe::Model,
    pub author: user::Model,
    pub author_is_subscribed: bool,
    pub tags: Vec<tag::Model>,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Filters and pagination for recipe listing.
#[derive(Debug, Default, Clone)]
pub struct RecipeListQuery {
    pub author_id: Option<String>,
    pub tag_slugs: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Recipe service for business logic.
#[derive(Clone)]
pub struct RecipeService {
    recipe_repo: RecipeRepository,
    recipe_ingredient_repo: RecipeIngredientRepository,
    recipe_tag_repo: RecipeTagRepository,
    tag_repo: TagRepository,
    ingredient_repo: IngredientRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    favorite_repo: FavoriteRepository,
    cart_repo: ShoppingCartRepository,
    id_gen: IdGenerator,
}

impl RecipeService {
    /// Create a new recipe service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        recipe_repo: RecipeRepository,
        recipe_ingredient_repo: RecipeIngredientRepository,
        recipe_tag_repo: RecipeTagRepository,
        tag_repo: TagRepository,
        ingredient_repo: IngredientRepository,
        user_repo: UserRepository,
        follow_repo: FollowRepository,
        favorite_repo: FavoriteRepository,
        cart_repo: ShoppingCartRepository,
    ) -> Self {
        Self {
            recipe_repo,
            recipe_ingredient_repo,
            recipe_tag_repo,
            tag_repo,
            ingredient_repo,
            user_repo,
            follow_repo,
            favorite_repo,
            cart_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a recipe with its ingredient and tag rows.
    pub async fn create(&self, author: &user::Model, input: RecipeInput) -> AppResult<RecipeDetail> {
        self.validate_input(&input).await?;

        let recipe_model = recipe::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author.id.clone()),
            name: Set(input.name.clone()),
            text: Set(input.text.clone()),
            image: Set(input.image.clone()),
            cooking_time: Set(input.cooking_time),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        let recipe = self.recipe_repo.create(recipe_model).await?;

        self.insert_associations(&recipe.id, &input).await?;

        tracing::info!(recipe_id = %recipe.id, author_id = %author.id, "Recipe created");
        self.compose_detail(recipe, Some(author)).await
    }

    /// Fully replace a recipe. Author or admin only.
    pub async fn update(
        &self,
        actor: &user::Model,
        recipe_id: &str,
        input: RecipeInput,
    ) -> AppResult<RecipeDetail> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;
        if recipe.author_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only the author may edit this recipe".to_string(),
            ));
        }

        self.validate_input(&input).await?;

        let mut active: recipe::ActiveModel = recipe.into();
        active.name = Set(input.name.clone());
        active.text = Set(input.text.clone());
        active.image = Set(input.image.clone());
        active.cooking_time = Set(input.cooking_time);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        let recipe = self.recipe_repo.update(active).await?;

        // Full replace: clear and rebuild associations
        self.recipe_ingredient_repo.delete_by_recipe(recipe_id).await?;
        self.recipe_tag_repo.delete_by_recipe(recipe_id).await?;
        self.insert_associations(recipe_id, &input).await?;

        self.compose_detail(recipe, Some(actor)).await
    }

    /// Delete a recipe. Author or admin only.
    pub async fn delete(&self, actor: &user::Model, recipe_id: &str) -> AppResult<()> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;
        if recipe.author_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only the author may delete this recipe".to_string(),
            ));
        }

        self.recipe_repo.delete(recipe_id).await?;
        tracing::info!(recipe_id = %recipe_id, actor_id = %actor.id, "Recipe deleted");
        Ok(())
    }

    /// Get the nested detail view of a recipe.
    pub async fn get_detail(
        &self,
        recipe_id: &str,
        viewer: Option<&user::Model>,
    ) -> AppResult<RecipeDetail> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;
        self.compose_detail(recipe, viewer).await
    }

    /// List recipes with filters, each as a nested detail view.
    pub async fn list(
        &self,
        query: &RecipeListQuery,
        viewer: Option<&user::Model>,
    ) -> AppResult<Vec<RecipeDetail>> {
        let id_in = self.resolve_id_filter(query, viewer).await?;

        let filter = RecipeFilter {
            author_id: query.author_id.clone(),
            id_in,
        };
        let recipes = self
            .recipe_repo
            .list(&filter, query.limit, query.until_id.as_deref())
            .await?;

        let mut details = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            details.push(self.compose_detail(recipe, viewer).await?);
        }
        Ok(details)
    }

    /// Resolve tag/favorite/cart filters to an ID set constraint.
    ///
    /// Membership filters require a viewer and are ignored for anonymous
    /// requests. `Some(vec![])` means "match nothing".
    async fn resolve_id_filter(
        &self,
        query: &RecipeListQuery,
        viewer: Option<&user::Model>,
    ) -> AppResult<Option<Vec<String>>> {
        let mut constraint: Option<Vec<String>> = None;

        if !query.tag_slugs.is_empty() {
            let tags = self.tag_repo.find_by_slugs(&query.tag_slugs).await?;
            let tag_ids: Vec<String> = tags.into_iter().map(|t| t.id).collect();
            let ids = self.recipe_tag_repo.find_recipe_ids_by_tag_ids(&tag_ids).await?;
            constraint = Some(ids);
        }

        if let Some(viewer) = viewer {
            if query.is_favorited {
                let ids = self.favorite_repo.find_recipe_ids_by_user(&viewer.id).await?;
                constraint = Some(intersect(constraint, ids));
            }
            if query.is_in_shopping_cart {
                let ids = self.cart_repo.find_recipe_ids_by_user(&viewer.id).await?;
                constraint = Some(intersect(constraint, ids));
            }
        }

        Ok(constraint)
    }

    async fn validate_input(&self, input: &RecipeInput) -> AppResult<()> {
        input.validate()?;

        let mut seen = HashSet::new();
        for line in &input.ingredients {
            if !seen.insert(line.id.as_str()) {
                return Err(AppError::DuplicateIngredient(line.id.clone()));
            }
        }

        let mut seen_tags = HashSet::new();
        for tag_id in &input.tags {
            if !seen_tags.insert(tag_id.as_str()) {
                return Err(AppError::BadRequest(format!("Duplicate tag: {tag_id}")));
            }
        }

        let tags = self.tag_repo.find_by_ids(&input.tags).await?;
        if tags.len() != input.tags.len() {
            return Err(AppError::NotFound("one or more tags".to_string()));
        }

        let ingredient_ids: Vec<String> =
            input.ingredients.iter().map(|line| line.id.clone()).collect();
        let ingredients = self.ingredient_repo.find_by_ids(&ingredient_ids).await?;
        if ingredients.len() != ingredient_ids.len() {
            return Err(AppError::NotFound("one or more ingredients".to_string()));
        }

        Ok(())
    }

    async fn insert_associations(&self, recipe_id: &str, input: &RecipeInput) -> AppResult<()> {
        let ingredient_rows = input
            .ingredients
            .iter()
            .map(|line| recipe_ingredient::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                ingredient_id: Set(line.id.clone()),
                amount: Set(line.amount),
            })
            .collect();
        self.recipe_ingredient_repo.create_many(ingredient_rows).await?;

        let tag_rows = input
            .tags
            .iter()
            .map(|tag_id| recipe_tag::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(recipe_id.to_string()),
                tag_id: Set(tag_id.clone()),
            })
            .collect();
        self.recipe_tag_repo.create_many(tag_rows).await
    }

    async fn compose_detail(
        &self,
        recipe: recipe::Model,
        viewer: Option<&user::Model>,
    ) -> AppResult<RecipeDetail> {
        let author = self.user_repo.get_by_id(&recipe.author_id).await?;
        let tags = self.recipe_tag_repo.find_tags_by_recipe(&recipe.id).await?;

        let ingredients = self
            .recipe_ingredient_repo
            .find_with_ingredient_by_recipe(&recipe.id)
            .await?
            .into_iter()
            .filter_map(|(row, ingredient)| {
                ingredient.map(|i| RecipeIngredientView {
                    ingredient: i,
                    amount: row.amount,
                })
            })
            .collect();

        let (author_is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                self.follow_repo.is_subscribed(&viewer.id, &author.id).await?,
                self.favorite_repo.is_favorited(&viewer.id, &recipe.id).await?,
                self.cart_repo.is_in_cart(&viewer.id, &recipe.id).await?,
            ),
            None => (false, false, false),
        };

        Ok(RecipeDetail {
            recipe,
            author,
            author_is_subscribed,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

fn intersect(constraint: Option<Vec<String>>, ids: Vec<String>) -> Vec<String> {
    match constraint {
        None => ids,
        Some(existing) => {
            let keep: HashSet<String> = ids.into_iter().collect();
            existing.into_iter().filter(|id| keep.contains(id)).collect()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foodgram_db::entities::{favorite, follow, shopping_cart, user::Role};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_user(id: &str, role: Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_recipe(id: &str, author_id: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            name: "Pancakes".to_string(),
            text: "Mix and cook.".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            cooking_time: 20,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_input(ingredient_ids: &[&str], tag_ids: &[&str]) -> RecipeInput {
        RecipeInput {
            name: "Pancakes".to_string(),
            text: "Mix and cook.".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            cooking_time: 20,
            ingredients: ingredient_ids
                .iter()
                .map(|id| IngredientAmountInput {
                    id: (*id).to_string(),
                    amount: 2,
                })
                .collect(),
            tags: tag_ids.iter().map(|id| (*id).to_string()).collect(),
        }
    }

    fn service_with(
        recipe_db: Arc<DatabaseConnection>,
        tag_db: Arc<DatabaseConnection>,
        ingredient_db: Arc<DatabaseConnection>,
    ) -> RecipeService {
        RecipeService::new(
            RecipeRepository::new(recipe_db),
            RecipeIngredientRepository::new(empty_db()),
            RecipeTagRepository::new(empty_db()),
            TagRepository::new(tag_db),
            IngredientRepository::new(ingredient_db),
            UserRepository::new(empty_db()),
            FollowRepository::new(empty_db()),
            FavoriteRepository::new(empty_db()),
            ShoppingCartRepository::new(empty_db()),
        )
    }

    #[tokio::test]
    async fn test_create_duplicate_ingredient_rejected() {
        let service = service_with(empty_db(), empty_db(), empty_db());
        let author = create_test_user("u1", Role::User);

        let result = service
            .create(&author, test_input(&["i1", "i1"], &["t1"]))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateIngredient(_))));
    }

    #[tokio::test]
    async fn test_create_zero_cooking_time_rejected() {
        let service = service_with(empty_db(), empty_db(), empty_db());
        let author = create_test_user("u1", Role::User);

        let mut input = test_input(&["i1"], &["t1"]);
        input.cooking_time = 0;
        let result = service.create(&author, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_zero_amount_rejected() {
        let service = service_with(empty_db(), empty_db(), empty_db());
        let author = create_test_user("u1", Role::User);

        let mut input = test_input(&["i1"], &["t1"]);
        input.ingredients[0].amount = 0;
        let result = service.create(&author, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_tag_rejected() {
        let tag_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()])
                .into_connection(),
        );
        let service = service_with(empty_db(), tag_db, empty_db());
        let author = create_test_user("u1", Role::User);

        let result = service.create(&author, test_input(&["i1"], &["ghost"])).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_author_forbidden() {
        let recipe = create_test_recipe("r1", "owner");
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe]])
                .into_connection(),
        );
        let service = service_with(recipe_db, empty_db(), empty_db());
        let actor = create_test_user("intruder", Role::User);

        let result = service
            .update(&actor, "r1", test_input(&["i1"], &["t1"]))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_author_forbidden() {
        let recipe = create_test_recipe("r1", "owner");
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe]])
                .into_connection(),
        );
        let service = service_with(recipe_db, empty_db(), empty_db());
        let actor = create_test_user("intruder", Role::User);

        let result = service.delete(&actor, "r1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_recipe() {
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );
        let service = service_with(recipe_db, empty_db(), empty_db());
        let actor = create_test_user("u1", Role::User);

        let result = service.delete(&actor, "ghost").await;

        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    fn tag_join_row(row_id: &str, recipe_id: &str, tag: &tag::Model) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("A_id", Value::from(row_id)),
            ("A_recipe_id", Value::from(recipe_id)),
            ("A_tag_id", Value::from(tag.id.as_str())),
            ("B_id", Value::from(tag.id.as_str())),
            ("B_name", Value::from(tag.name.as_str())),
            ("B_color", Value::from(tag.color.as_str())),
            ("B_slug", Value::from(tag.slug.as_str())),
        ])
    }

    fn ingredient_join_row(
        row_id: &str,
        recipe_id: &str,
        ingredient: &ingredient::Model,
        amount: i32,
    ) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("A_id", Value::from(row_id)),
            ("A_recipe_id", Value::from(recipe_id)),
            ("A_ingredient_id", Value::from(ingredient.id.as_str())),
            ("A_amount", Value::from(amount)),
            ("B_id", Value::from(ingredient.id.as_str())),
            ("B_name", Value::from(ingredient.name.as_str())),
            ("B_measurement_unit", Value::from(ingredient.measurement_unit.as_str())),
        ])
    }

    #[tokio::test]
    async fn test_create_round_trips_tags_and_ingredient_lines() {
        let author = create_test_user("u1", Role::User);
        let recipe = create_test_recipe("r1", "u1");
        let breakfast = tag::Model {
            id: "t1".to_string(),
            name: "Breakfast".to_string(),
            color: "#FF0000".to_string(),
            slug: "breakfast".to_string(),
        };
        let flour = ingredient::Model {
            id: "i1".to_string(),
            name: "flour".to_string(),
            measurement_unit: "g".to_string(),
        };
        let milk = ingredient::Model {
            id: "i2".to_string(),
            name: "milk".to_string(),
            measurement_unit: "ml".to_string(),
        };

        let tag_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[breakfast.clone()]])
                .into_connection(),
        );
        let ingredient_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[flour.clone(), milk.clone()]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe]])
                .into_connection(),
        );
        let ri_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .append_query_results([vec![
                    ingredient_join_row("ri1", "r1", &flour, 200),
                    ingredient_join_row("ri2", "r1", &milk, 300),
                ]])
                .into_connection(),
        );
        let rt_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([vec![tag_join_row("rt1", "r1", &breakfast)]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author.clone()]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );
        let favorite_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );
        let cart_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<shopping_cart::Model>::new()])
                .into_connection(),
        );

        let service = RecipeService::new(
            RecipeRepository::new(recipe_db),
            RecipeIngredientRepository::new(ri_db),
            RecipeTagRepository::new(rt_db),
            TagRepository::new(tag_db),
            IngredientRepository::new(ingredient_db),
            UserRepository::new(user_db),
            FollowRepository::new(follow_db),
            FavoriteRepository::new(favorite_db),
            ShoppingCartRepository::new(cart_db),
        );

        let mut input = test_input(&["i1", "i2"], &["t1"]);
        input.ingredients[0].amount = 200;
        input.ingredients[1].amount = 300;

        let detail = service.create(&author, input).await.unwrap();

        assert_eq!(detail.recipe.id, "r1");
        assert_eq!(detail.author.id, "u1");
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.tags[0].slug, "breakfast");
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.ingredients[0].ingredient.name, "flour");
        assert_eq!(detail.ingredients[0].amount, 200);
        assert_eq!(detail.ingredients[1].amount, 300);
        assert!(!detail.is_favorited);
        assert!(!detail.is_in_shopping_cart);
    }

    #[test]
    fn test_intersect_keeps_common_ids() {
        let result = intersect(
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        );
        assert_eq!(result, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_intersect_none_passes_through() {
        let result = intersect(None, vec!["a".to_string()]);
        assert_eq!(result, vec!["a".to_string()]);
    }
}
