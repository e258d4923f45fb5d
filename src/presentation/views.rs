use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::application::error::{ErrorReport, HttpError};
use crate::application::pagination::PageItem;
use crate::application::repos::{CategoryWithCount, TagWithCount};
use crate::domain::entities::{PostDetail, PostSummaryRecord};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError {
            source: "presentation::views::render_template",
            public_message: "Template rendering failed",
            error: err,
        }
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let mut response = render_template_response(
        ErrorTemplate {
            status: 404,
            message: "The page you are looking for does not exist.",
        },
        StatusCode::NOT_FOUND,
    );
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub fn format_date(value: Option<OffsetDateTime>) -> String {
    value
        .and_then(|when| when.format(&DATE_FORMAT).ok())
        .unwrap_or_else(|| "—".to_string())
}

#[derive(Clone)]
pub struct PostCard {
    pub title: String,
    pub href: String,
    pub excerpt: String,
    pub category_name: String,
    pub category_href: String,
    pub read_time_minutes: i32,
    pub published_label: String,
}

impl PostCard {
    pub fn from_summary(summary: &PostSummaryRecord) -> Self {
        Self {
            title: summary.title.clone(),
            href: format!("/posts/{}", summary.slug),
            excerpt: summary.excerpt.clone(),
            category_name: summary.category_name.clone(),
            category_href: format!("/categories/{}", summary.category_slug),
            read_time_minutes: summary.read_time_minutes,
            published_label: format_date(summary.published_at),
        }
    }
}

#[derive(Clone)]
pub struct CategoryBadge {
    pub name: String,
    pub href: String,
    pub count: u64,
    pub color: Option<String>,
}

impl CategoryBadge {
    pub fn from_count(entry: &CategoryWithCount) -> Self {
        Self {
            name: entry.category.name.clone(),
            href: format!("/categories/{}", entry.category.slug),
            count: entry.published_posts,
            color: entry.category.color.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TagBadge {
    pub name: String,
    pub href: String,
    pub count: u64,
}

impl TagBadge {
    pub fn from_count(entry: &TagWithCount) -> Self {
        Self {
            name: entry.tag.name.clone(),
            href: format!("/tags/{}", entry.tag.slug),
            count: entry.published_posts,
        }
    }
}

/// One slot in a rendered pagination strip; an elided range renders as a
/// plain `…` with no link.
#[derive(Clone)]
pub struct WindowSlot {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

pub fn build_window_slots(
    window: &[PageItem],
    current: u32,
    href_for: impl Fn(u32) -> String,
) -> Vec<WindowSlot> {
    window
        .iter()
        .map(|item| match item {
            PageItem::Page(number) => WindowSlot {
                label: number.to_string(),
                href: Some(href_for(*number)),
                current: *number == current,
            },
            PageItem::Ellipsis => WindowSlot {
                label: "…".to_string(),
                href: None,
                current: false,
            },
        })
        .collect()
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub latest: Vec<PostCard>,
    pub categories: Vec<CategoryBadge>,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub heading: String,
    pub description: Option<String>,
    pub posts: Vec<PostCard>,
    pub window: Vec<WindowSlot>,
    pub tags: Vec<TagBadge>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub title: String,
    pub content_html: String,
    pub excerpt: String,
    pub category: CategoryBadge,
    pub tags: Vec<TagBadge>,
    pub author_name: String,
    pub published_label: String,
    pub read_time_minutes: i32,
    pub view_count: i64,
}

impl PostTemplate {
    pub fn from_detail(detail: &PostDetail) -> Self {
        Self {
            title: detail.post.title.clone(),
            content_html: detail.post.content.clone(),
            excerpt: detail.post.excerpt.clone(),
            category: CategoryBadge {
                name: detail.category.name.clone(),
                href: format!("/categories/{}", detail.category.slug),
                count: 0,
                color: detail.category.color.clone(),
            },
            tags: detail
                .tags
                .iter()
                .map(|tag| TagBadge {
                    name: tag.name.clone(),
                    href: format!("/tags/{}", tag.slug),
                    count: 0,
                })
                .collect(),
            author_name: detail.author.name.clone(),
            published_label: format_date(detail.post.published_at),
            read_time_minutes: detail.post.read_time_minutes,
            view_count: detail.post.view_count,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: &'static str,
}
