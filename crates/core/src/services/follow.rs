//! Follow (subscription) service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{follow, recipe, user},
    repositories::{FollowRepository, RecipeRepository, UserRepository},
};
use sea_orm::Set;

/// A followed author together with their recipes.
#[derive(Debug, Clone)]
pub struct SubscriptionView {
    pub author: user::Model,
    pub recipes: Vec<recipe::Model>,
    pub recipes_count: u64,
}

/// Follow service for managing subscriptions.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        recipe_repo: RecipeRepository,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Subscribe to an author.
    ///
    /// Returns the author with their recipes, the payload the subscribe
    /// endpoint responds with.
    pub async fn subscribe(
        &self,
        user_id: &str,
        author_id: &str,
        recipes_limit: Option<u64>,
    ) -> AppResult<SubscriptionView> {
        if user_id == author_id {
            return Err(AppError::SelfReferenceNotAllowed);
        }

        let author = self.user_repo.get_by_id(author_id).await?;

        if self.follow_repo.is_subscribed(user_id, author_id).await? {
            return Err(AppError::AlreadyExists("subscription".to_string()));
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            author_id: Set(author_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.follow_repo.create(model).await?;

        self.subscription_view(author, recipes_limit).await
    }

    /// Unsubscribe from an author.
    pub async fn unsubscribe(&self, user_id: &str, author_id: &str) -> AppResult<()> {
        if !self.follow_repo.is_subscribed(user_id, author_id).await? {
            return Err(AppError::NotFound("subscription".to_string()));
        }

        self.follow_repo.delete_by_pair(user_id, author_id).await
    }

    /// Check if a user is subscribed to an author.
    pub async fn is_subscribed(&self, user_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_subscribed(user_id, author_id).await
    }

    /// Get the authors a user is subscribed to, with their recipes.
    pub async fn subscriptions(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        recipes_limit: Option<u64>,
    ) -> AppResult<Vec<SubscriptionView>> {
        let follows = self.follow_repo.find_by_user(user_id, limit, until_id).await?;

        let mut views = Vec::with_capacity(follows.len());
        for follow in follows {
            let author = self.user_repo.get_by_id(&follow.author_id).await?;
            views.push(self.subscription_view(author, recipes_limit).await?);
        }

        Ok(views)
    }

    async fn subscription_view(
        &self,
        author: user::Model,
        recipes_limit: Option<u64>,
    ) -> AppResult<SubscriptionView> {
        let recipes = self
            .recipe_repo
            .find_by_author(&author.id, recipes_limit)
            .await?;
        let recipes_count = self.recipe_repo.count_by_author(&author.id).await?;

        Ok(SubscriptionView {
            author,
            recipes,
            recipes_count,
        })
    }
}
