//! Views for the admin console pages.

use askama::Template;

use crate::domain::entities::{CategoryRecord, PostRecord, PostSummaryRecord, TagRecord};
use crate::domain::types::PostStatus;
use crate::presentation::views::{WindowSlot, format_date};

#[derive(Clone)]
pub struct AdminPostRow {
    pub title: String,
    pub slug: String,
    pub status_label: &'static str,
    pub category_name: String,
    pub view_count: i64,
    pub updated_label: String,
    pub edit_href: String,
    pub delete_action: String,
    pub publish_action: Option<String>,
    pub archive_action: Option<String>,
}

impl AdminPostRow {
    pub fn from_summary(summary: &PostSummaryRecord) -> Self {
        let base = format!("/posts/{}", summary.id);
        Self {
            title: summary.title.clone(),
            slug: summary.slug.clone(),
            status_label: status_label(summary.status),
            category_name: summary.category_name.clone(),
            view_count: summary.view_count,
            updated_label: format_date(Some(summary.updated_at)),
            edit_href: format!("{base}/edit"),
            delete_action: format!("{base}/delete"),
            publish_action: (summary.status != PostStatus::Published)
                .then(|| format!("{base}/publish")),
            archive_action: (summary.status == PostStatus::Published)
                .then(|| format!("{base}/archive")),
        }
    }
}

fn status_label(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "Draft",
        PostStatus::Published => "Published",
        PostStatus::Archived => "Archived",
    }
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub rows: Vec<AdminPostRow>,
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub window: Vec<WindowSlot>,
}

#[derive(Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone)]
pub struct TagCheckbox {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Shared editor for creating and updating a post; `post` carries the
/// current values when editing.
#[derive(Template)]
#[template(path = "admin/post_form.html")]
pub struct AdminPostFormTemplate {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub categories: Vec<SelectOption>,
    pub tags: Vec<TagCheckbox>,
}

impl AdminPostFormTemplate {
    pub fn for_new(categories: Vec<SelectOption>, tags: Vec<TagCheckbox>) -> Self {
        Self {
            heading: "New post",
            action: "/posts/create".to_string(),
            submit_label: "Create draft",
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            categories,
            tags,
        }
    }

    pub fn for_edit(
        post: &PostRecord,
        categories: Vec<SelectOption>,
        tags: Vec<TagCheckbox>,
    ) -> Self {
        Self {
            heading: "Edit post",
            action: format!("/posts/{}/edit", post.id),
            submit_label: "Save changes",
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            categories,
            tags,
        }
    }
}

#[derive(Clone)]
pub struct AdminCategoryRow {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub delete_action: String,
}

impl AdminCategoryRow {
    pub fn from_record(record: &CategoryRecord) -> Self {
        Self {
            name: record.name.clone(),
            slug: record.slug.clone(),
            description: record.description.clone().unwrap_or_default(),
            delete_action: format!("/categories/{}/delete", record.id),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/categories.html")]
pub struct AdminCategoriesTemplate {
    pub rows: Vec<AdminCategoryRow>,
}

#[derive(Clone)]
pub struct AdminTagRow {
    pub name: String,
    pub slug: String,
    pub delete_action: String,
}

impl AdminTagRow {
    pub fn from_record(record: &TagRecord) -> Self {
        Self {
            name: record.name.clone(),
            slug: record.slug.clone(),
            delete_action: format!("/tags/{}/delete", record.id),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/tags.html")]
pub struct AdminTagsTemplate {
    pub rows: Vec<AdminTagRow>,
}
