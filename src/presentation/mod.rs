//! Askama views for the public reader and the admin console.

pub mod admin;
pub mod views;
