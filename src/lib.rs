//! ByteBrief: a content-managed blog and news site.
//!
//! The crate is layered bottom-up: `domain` holds pure entities and rules,
//! `application` holds repository contracts and services, `infra` holds the
//! Postgres, cache, upload, and HTTP adapters, and `presentation` holds the
//! askama views rendered by the HTTP layer.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
