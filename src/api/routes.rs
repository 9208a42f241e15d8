//! API Routes
//!
//! Configures the Axum router with the employee endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_employee, delete_employee, get_employee, health_handler, list_employees,
    stats_handler, update_employee, AppState,
};

/// Base path of the employee resource
pub const EMPLOYEES_PATH: &str = "/api/v1/employees";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/v1/employees` - List employees (cached)
/// - `POST /api/v1/employees` - Create an employee
/// - `GET /api/v1/employees/:id` - Fetch one employee
/// - `PUT /api/v1/employees/:id` - Replace an employee
/// - `DELETE /api/v1/employees/:id` - Delete an employee
/// - `GET /stats` - List cache statistics
/// - `GET /health` - Health check endpoint
///
/// The collection also answers with a trailing slash.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let collection = get(list_employees).post(create_employee);
    let member = get(get_employee)
        .put(update_employee)
        .delete(delete_employee);

    Router::new()
        .route(EMPLOYEES_PATH, collection.clone())
        .route(&format!("{}/", EMPLOYEES_PATH), collection)
        .route(&format!("{}/:id", EMPLOYEES_PATH), member)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
