//! Business logic services.

pub mod favorite;
pub mod follow;
pub mod ingredient;
pub mod recipe;
pub mod shopping_cart;
pub mod tag;
pub mod user;

pub use favorite::FavoriteService;
pub use follow::FollowService;
pub use ingredient::IngredientService;
pub use recipe::RecipeService;
pub use shopping_cart::ShoppingCartService;
pub use tag::TagService;
pub use user::UserService;
