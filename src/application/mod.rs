//! Application layer: repository contracts and the services behind each
//! HTTP surface.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod repos;
