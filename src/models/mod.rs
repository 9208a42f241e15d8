//! Data models for the employee API
//!
//! This module defines the employee resource and the auxiliary DTOs
//! serialized into HTTP response bodies.

pub mod employee;
pub mod responses;

// Re-export commonly used types
pub use employee::{Employee, EmployeeId};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
