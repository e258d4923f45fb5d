//! Category management for the admin console.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};

#[derive(Debug, Error)]
pub enum AdminCategoryError {
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),
    #[error("slug `{0}` is already in use")]
    DuplicateSlug(String),
    #[error("category has {published_posts} published posts and cannot be deleted")]
    InUse { published_posts: u64 },
    #[error("category not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryCommand {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone)]
pub struct AdminCategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
}

impl AdminCategoryService {
    pub fn new(reader: Arc<dyn CategoriesRepo>, writer: Arc<dyn CategoriesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<CategoryRecord>, AdminCategoryError> {
        self.reader
            .list_categories()
            .await
            .map_err(AdminCategoryError::from)
    }

    pub async fn create(
        &self,
        actor: &str,
        command: CreateCategoryCommand,
    ) -> Result<CategoryRecord, AdminCategoryError> {
        if command.name.trim().is_empty() {
            return Err(AdminCategoryError::MissingField("name"));
        }

        let slug = self.generate_slug(&command.name, None).await?;
        let category = self
            .writer
            .create_category(CreateCategoryParams {
                slug,
                name: command.name,
                description: command.description,
                color: command.color,
                icon: command.icon,
            })
            .await?;

        info!(
            target = "bytebrief::admin::categories",
            actor,
            slug = %category.slug,
            "category created"
        );

        Ok(category)
    }

    pub async fn update(
        &self,
        actor: &str,
        command: UpdateCategoryCommand,
    ) -> Result<CategoryRecord, AdminCategoryError> {
        if command.name.trim().is_empty() {
            return Err(AdminCategoryError::MissingField("name"));
        }

        let existing = self
            .reader
            .find_by_id(command.id)
            .await?
            .ok_or(AdminCategoryError::NotFound)?;

        // Renaming re-derives the slug; an unchanged name keeps the slug the
        // post URLs already point at.
        let slug = if existing.name == command.name {
            existing.slug
        } else {
            self.generate_slug(&command.name, Some(command.id)).await?
        };

        let category = self
            .writer
            .update_category(UpdateCategoryParams {
                id: command.id,
                slug,
                name: command.name,
                description: command.description,
                color: command.color,
                icon: command.icon,
            })
            .await?;

        info!(
            target = "bytebrief::admin::categories",
            actor,
            slug = %category.slug,
            "category updated"
        );

        Ok(category)
    }

    /// Delete a category, refusing while Published posts still reference it.
    pub async fn delete(&self, actor: &str, id: Uuid) -> Result<(), AdminCategoryError> {
        let published_posts = self.reader.count_published_posts(id).await?;
        if published_posts > 0 {
            return Err(AdminCategoryError::InUse { published_posts });
        }

        self.writer.delete_category(id).await?;

        info!(
            target = "bytebrief::admin::categories",
            actor,
            category_id = %id,
            "category deleted"
        );

        Ok(())
    }

    async fn generate_slug(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<String, AdminCategoryError> {
        let reader = self.reader.clone();
        match generate_unique_slug_async(name, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .slug_in_use(&candidate, exclude_id)
                    .await
                    .map(|in_use| !in_use)
            }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(SlugError::EmptyInput | SlugError::Unrepresentable { .. })) => {
                Err(AdminCategoryError::MissingField("name"))
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { base })) => {
                Err(AdminCategoryError::DuplicateSlug(base))
            }
            Err(SlugAsyncError::Predicate(err)) => Err(AdminCategoryError::Repo(err)),
        }
    }
}
