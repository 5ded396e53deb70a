//! Shopping cart service and shopping-list aggregation.

use std::collections::BTreeMap;

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{recipe, shopping_cart},
    repositories::{RecipeIngredientRepository, RecipeRepository, ShoppingCartRepository},
};
use sea_orm::Set;

/// Header line of the rendered shopping list.
const SHOPPING_LIST_HEADER: &str = "Список покупок:";

/// Shopping cart service for managing cart entries and building the
/// downloadable shopping list.
#[derive(Clone)]
pub struct ShoppingCartService {
    cart_repo: ShoppingCartRepository,
    recipe_repo: RecipeRepository,
    recipe_ingredient_repo: RecipeIngredientRepository,
    id_gen: IdGenerator,
}

impl ShoppingCartService {
    /// Create a new shopping cart service.
    #[must_use]
    pub const fn new(
        cart_repo: ShoppingCartRepository,
        recipe_repo: RecipeRepository,
        recipe_ingredient_repo: RecipeIngredientRepository,
    ) -> Self {
        Self {
            cart_repo,
            recipe_repo,
            recipe_ingredient_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a recipe to the cart. Returns the recipe for the response body.
    pub async fn add(&self, user_id: &str, recipe_id: &str) -> AppResult<recipe::Model> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;

        if self.cart_repo.is_in_cart(user_id, recipe_id).await? {
            return Err(AppError::AlreadyExists("shopping cart entry".to_string()));
        }

        let model = shopping_cart::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            recipe_id: Set(recipe_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.cart_repo.create(model).await?;

        Ok(recipe)
    }

    /// Remove a recipe from the cart.
    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        if !self.cart_repo.is_in_cart(user_id, recipe_id).await? {
            return Err(AppError::NotFound("shopping cart entry".to_string()));
        }

        self.cart_repo.delete_by_pair(user_id, recipe_id).await
    }

    /// Check if a recipe is in the user's cart.
    pub async fn is_in_cart(&self, user_id: &str, recipe_id: &str) -> AppResult<bool> {
        self.cart_repo.is_in_cart(user_id, recipe_id).await
    }

    /// Get recipe IDs in a user's cart.
    pub async fn cart_recipe_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.cart_repo.find_recipe_ids_by_user(user_id).await
    }

    /// Build the aggregated shopping list text for a user's cart.
    ///
    /// Sums amounts per (ingredient name, measurement unit) across every
    /// recipe in the cart. The same name with different units stays on
    /// separate lines.
    pub async fn build_shopping_list(&self, user_id: &str) -> AppResult<String> {
        let recipe_ids = self.cart_repo.find_recipe_ids_by_user(user_id).await?;
        if recipe_ids.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let rows = self
            .recipe_ingredient_repo
            .find_with_ingredient_by_recipe_ids(&recipe_ids)
            .await?;

        let items = rows.into_iter().filter_map(|(row, ingredient)| {
            ingredient.map(|i| (i.name, i.measurement_unit, i64::from(row.amount)))
        });

        Ok(render_shopping_list(items))
    }
}

/// Render the shopping list text from (name, unit, amount) items.
///
/// Lines are ordered by (name, unit) so the output is reproducible
/// regardless of query order.
pub fn render_shopping_list(items: impl IntoIterator<Item = (String, String, i64)>) -> String {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for (name, unit, amount) in items {
        *totals.entry((name, unit)).or_insert(0) += amount;
    }

    let mut out = String::from(SHOPPING_LIST_HEADER);
    out.push('\n');
    for ((name, unit), amount) in totals {
        out.push_str(&format!("{name}, {unit} - {amount}\n"));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_recipe(id: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            author_id: "author1".to_string(),
            name: "Pancakes".to_string(),
            text: "Mix and cook.".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            cooking_time: 20,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_entry(id: &str, user_id: &str, recipe_id: &str) -> shopping_cart::Model {
        shopping_cart::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_render_sums_same_name_and_unit() {
        let text = render_shopping_list(vec![
            ("eggs".to_string(), "pcs".to_string(), 2),
            ("milk".to_string(), "liter".to_string(), 1),
            ("eggs".to_string(), "pcs".to_string(), 3),
        ]);

        assert!(text.starts_with("Список покупок:\n"));
        assert!(text.contains("eggs, pcs - 5\n"));
        assert!(text.contains("milk, liter - 1\n"));
    }

    #[test]
    fn test_render_keeps_different_units_separate() {
        let text = render_shopping_list(vec![
            ("sugar".to_string(), "kg".to_string(), 1),
            ("sugar".to_string(), "gram".to_string(), 100),
        ]);

        assert!(text.contains("sugar, kg - 1\n"));
        assert!(text.contains("sugar, gram - 100\n"));
    }

    #[test]
    fn test_render_orders_by_name_and_unit() {
        let text = render_shopping_list(vec![
            ("milk".to_string(), "liter".to_string(), 1),
            ("eggs".to_string(), "pcs".to_string(), 2),
        ]);

        let eggs_pos = text.find("eggs").unwrap();
        let milk_pos = text.find("milk").unwrap();
        assert!(eggs_pos < milk_pos);
    }

    #[tokio::test]
    async fn test_build_shopping_list_empty_cart() {
        let cart_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<shopping_cart::Model>::new()])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let ri_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ShoppingCartService::new(
            ShoppingCartRepository::new(cart_db),
            RecipeRepository::new(recipe_db),
            RecipeIngredientRepository::new(ri_db),
        );
        let result = service.build_shopping_list("user1").await;

        assert!(matches!(result, Err(AppError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_add_already_in_cart() {
        let recipe = create_test_recipe("r1");
        let entry = create_test_entry("sc1", "user1", "r1");

        let cart_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe]])
                .into_connection(),
        );
        let ri_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ShoppingCartService::new(
            ShoppingCartRepository::new(cart_db),
            RecipeRepository::new(recipe_db),
            RecipeIngredientRepository::new(ri_db),
        );
        let result = service.add("user1", "r1").await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_remove_not_in_cart() {
        let cart_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<shopping_cart::Model>::new()])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let ri_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ShoppingCartService::new(
            ShoppingCartRepository::new(cart_db),
            RecipeRepository::new(recipe_db),
            RecipeIngredientRepository::new(ri_db),
        );
        let result = service.remove("user1", "r1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
