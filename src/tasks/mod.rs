//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: Removes expired list cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
