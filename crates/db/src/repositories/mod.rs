//! Database repositories.
//!
//! Thin query wrappers over an `Arc<DatabaseConnection>`. Business rules
//! live in `foodgram-core`; repositories only translate database errors
//! into [`foodgram_common::AppError`].

mod favorite;
mod follow;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod recipe_tag;
mod shopping_cart;
mod tag;
mod user;

pub use favorite::FavoriteRepository;
pub use follow::FollowRepository;
pub use ingredient::IngredientRepository;
pub use recipe::{RecipeFilter, RecipeRepository};
pub use recipe_ingredient::RecipeIngredientRepository;
pub use recipe_tag::RecipeTagRepository;
pub use shopping_cart::ShoppingCartRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
