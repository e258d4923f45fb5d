use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, UpdatePostParams, UpdatePostStatusParams};
use crate::domain::entities::PostRecord;
use crate::domain::read_time::estimate_read_time;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};
use crate::domain::types::PostStatus;

use super::service::AdminPostService;
use super::types::{AdminPostError, CreatePostCommand, UpdatePostCommand, ensure_non_empty};

impl AdminPostService {
    pub async fn create_post(
        &self,
        actor: &str,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.excerpt, "excerpt")?;
        ensure_non_empty(&command.content, "content")?;
        self.ensure_category_exists(command.category_id).await?;

        let slug = self.generate_slug(&command.title, None).await?;

        let params = CreatePostParams {
            slug,
            title: command.title,
            excerpt: command.excerpt,
            read_time_minutes: estimate_read_time(&command.content) as i32,
            content: command.content,
            status: command.status,
            category_id: command.category_id,
            author_id: command.author_id,
            published_at: None,
        };

        let post = self.writer.create_post(params).await?;
        self.replace_tags(post.id, &command.tag_ids).await?;

        info!(
            target = "bytebrief::admin::posts",
            actor,
            slug = %post.slug,
            status = post.status.as_str(),
            "post created"
        );

        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &str,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.excerpt, "excerpt")?;
        ensure_non_empty(&command.content, "content")?;
        self.ensure_category_exists(command.category_id).await?;

        let slug = if command.slug.trim().is_empty() {
            self.generate_slug(&command.title, Some(command.id)).await?
        } else {
            let candidate = command.slug.trim().to_string();
            if !self.slug_free(&candidate, Some(command.id)).await? {
                return Err(AdminPostError::DuplicateSlug(candidate));
            }
            candidate
        };

        let params = UpdatePostParams {
            id: command.id,
            slug,
            title: command.title,
            excerpt: command.excerpt,
            read_time_minutes: estimate_read_time(&command.content) as i32,
            content: command.content,
            category_id: command.category_id,
        };

        let post = self.writer.update_post(params).await?;
        self.replace_tags(post.id, &command.tag_ids).await?;

        info!(
            target = "bytebrief::admin::posts",
            actor,
            slug = %post.slug,
            "post updated"
        );

        Ok(post)
    }

    /// Move a post between Draft, Published, and Archived. The adapter stamps
    /// `published_at` on the first transition into Published and never clears
    /// it afterwards.
    pub async fn update_status(
        &self,
        actor: &str,
        id: Uuid,
        status: PostStatus,
    ) -> Result<PostRecord, AdminPostError> {
        let post = self
            .writer
            .update_post_status(UpdatePostStatusParams { id, status })
            .await?;

        info!(
            target = "bytebrief::admin::posts",
            actor,
            slug = %post.slug,
            status = post.status.as_str(),
            "post status changed"
        );

        Ok(post)
    }

    pub async fn delete_post(&self, actor: &str, id: Uuid) -> Result<(), AdminPostError> {
        self.writer.delete_post(id).await?;

        info!(
            target = "bytebrief::admin::posts",
            actor,
            post_id = %id,
            "post deleted"
        );

        Ok(())
    }

    async fn generate_slug(
        &self,
        title: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<String, AdminPostError> {
        let service = self.clone();
        match generate_unique_slug_async(title, move |candidate| {
            let service = service.clone();
            let candidate = candidate.to_string();
            async move { service.slug_free(&candidate, exclude_id).await }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(SlugError::EmptyInput | SlugError::Unrepresentable { .. })) => {
                Err(AdminPostError::MissingField("title"))
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { base })) => {
                Err(AdminPostError::DuplicateSlug(base))
            }
            Err(SlugAsyncError::Predicate(err)) => Err(AdminPostError::Repo(err)),
        }
    }

    async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), AdminPostError> {
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::new();
        for id in tag_ids {
            if seen.insert(*id) {
                normalized.push(*id);
            }
        }

        self.writer
            .replace_post_tags(post_id, &normalized)
            .await
            .map_err(AdminPostError::from)
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<(), AdminPostError> {
        match self.categories.find_by_id(category_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(AdminPostError::UnknownCategory(category_id)),
            Err(err) => Err(AdminPostError::Repo(err)),
        }
    }

    /// Tags the editor offers when composing a post.
    pub async fn available_tags(
        &self,
    ) -> Result<Vec<crate::domain::entities::TagRecord>, AdminPostError> {
        self.tags.list_tags().await.map_err(AdminPostError::from)
    }

    /// Categories the editor offers when composing a post.
    pub async fn available_categories(
        &self,
    ) -> Result<Vec<crate::domain::entities::CategoryRecord>, AdminPostError> {
        self.categories
            .list_categories()
            .await
            .map_err(AdminPostError::from)
    }
}
