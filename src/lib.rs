//! Employee API - A small CRUD HTTP service for employee records
//!
//! Serves list/get/create/update/delete over `/api/v1/employees`, with the
//! list read through a cache that every write invalidates.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
