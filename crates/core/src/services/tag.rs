//! Tag service.

use foodgram_common::{AppError, AppResult, IdGenerator};
use foodgram_db::{
    entities::{tag, user},
    repositories::TagRepository,
};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

#[allow(clippy::expect_used)]
static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));

#[allow(clippy::expect_used)]
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("color_format"))
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug_format"))
    }
}

/// Input for creating a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(custom(function = "validate_color"))]
    pub color: String,

    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: String,
}

/// Tag service for reference data.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub const fn new(tag_repo: TagRepository) -> Self {
        Self {
            tag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all tags.
    pub async fn list(&self) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.list().await
    }

    /// Get a tag by ID.
    pub async fn get(&self, id: &str) -> AppResult<tag::Model> {
        self.tag_repo.get_by_id(id).await
    }

    /// Create a tag. Admin only.
    pub async fn create(&self, actor: &user::Model, input: CreateTagInput) -> AppResult<tag::Model> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may create tags".to_string(),
            ));
        }
        input.validate()?;

        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            color: Set(input.color),
            slug: Set(input.slug),
        };

        self.tag_repo.create(model).await
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

    #[test]
    fn test_color_validation() {
        assert!(validate_color("#E26C2D").is_ok());
        assert!(validate_color("#e26c2d").is_ok());
        assert!(validate_color("E26C2D").is_err());
        assert!(validate_color("#XYZ123").is_err());
    }

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("breakfast").is_ok());
        assert!(validate_slug("second-breakfast_2").is_ok());
        assert!(validate_slug("no spaces").is_err());
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TagService::new(TagRepository::new(db));

        let actor = create_test_user("u1", Role::User);
        let result = service
            .create(
                &actor,
                CreateTagInput {
                    name: "Breakfast".to_string(),
                    color: "#E26C2D".to_string(),
                    slug: "breakfast".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_color() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TagService::new(TagRepository::new(db));

        let actor = create_test_user("u1", Role::Admin);
        let result = service
            .create(
                &actor,
                CreateTagInput {
                    name: "Breakfast".to_string(),
                    color: "orange".to_string(),
                    slug: "breakfast".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
