//! Services behind the admin console.

pub mod categories;
pub mod posts;
pub mod tags;
