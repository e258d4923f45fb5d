//! Infrastructure adapters: Postgres, cache, uploads, HTTP, telemetry.

pub mod cache;
pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
pub mod uploads;
