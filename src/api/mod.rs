//! API Module
//!
//! HTTP handlers and routing for the employee REST API.
//!
//! # Endpoints
//! - `GET /api/v1/employees` - List employees
//! - `GET /api/v1/employees/:id` - Fetch an employee
//! - `POST /api/v1/employees` - Create an employee
//! - `PUT /api/v1/employees/:id` - Replace an employee
//! - `DELETE /api/v1/employees/:id` - Delete an employee
//! - `GET /stats` - List cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, EMPLOYEES_PATH};
