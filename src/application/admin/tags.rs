//! Tag management for the admin console.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CreateTagParams, RepoError, TagsRepo, TagsWriteRepo, UpdateTagParams,
};
use crate::domain::entities::TagRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};

#[derive(Debug, Error)]
pub enum AdminTagError {
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),
    #[error("slug `{0}` is already in use")]
    DuplicateSlug(String),
    #[error("tag has {published_posts} published posts and cannot be deleted")]
    InUse { published_posts: u64 },
    #[error("tag not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminTagService {
    reader: Arc<dyn TagsRepo>,
    writer: Arc<dyn TagsWriteRepo>,
}

impl AdminTagService {
    pub fn new(reader: Arc<dyn TagsRepo>, writer: Arc<dyn TagsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<TagRecord>, AdminTagError> {
        self.reader.list_tags().await.map_err(AdminTagError::from)
    }

    pub async fn create(&self, actor: &str, name: &str) -> Result<TagRecord, AdminTagError> {
        if name.trim().is_empty() {
            return Err(AdminTagError::MissingField("name"));
        }

        let slug = self.generate_slug(name, None).await?;
        let tag = self
            .writer
            .create_tag(CreateTagParams {
                slug,
                name: name.trim().to_string(),
            })
            .await?;

        info!(
            target = "bytebrief::admin::tags",
            actor,
            slug = %tag.slug,
            "tag created"
        );

        Ok(tag)
    }

    pub async fn rename(
        &self,
        actor: &str,
        id: Uuid,
        name: &str,
    ) -> Result<TagRecord, AdminTagError> {
        if name.trim().is_empty() {
            return Err(AdminTagError::MissingField("name"));
        }

        let existing = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(AdminTagError::NotFound)?;

        let slug = if existing.name == name.trim() {
            existing.slug
        } else {
            self.generate_slug(name, Some(id)).await?
        };

        let tag = self
            .writer
            .update_tag(UpdateTagParams {
                id,
                slug,
                name: name.trim().to_string(),
            })
            .await?;

        info!(
            target = "bytebrief::admin::tags",
            actor,
            slug = %tag.slug,
            "tag renamed"
        );

        Ok(tag)
    }

    /// Delete a tag, refusing while Published posts still carry it.
    pub async fn delete(&self, actor: &str, id: Uuid) -> Result<(), AdminTagError> {
        let published_posts = self.reader.count_published_posts(id).await?;
        if published_posts > 0 {
            return Err(AdminTagError::InUse { published_posts });
        }

        self.writer.delete_tag(id).await?;

        info!(
            target = "bytebrief::admin::tags",
            actor,
            tag_id = %id,
            "tag deleted"
        );

        Ok(())
    }

    async fn generate_slug(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<String, AdminTagError> {
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
                Err(AdminTagError::MissingField("name"))
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { base })) => {
                Err(AdminTagError::DuplicateSlug(base))
            }
            Err(SlugAsyncError::Predicate(err)) => Err(AdminTagError::Repo(err)),
        }
    }
}
