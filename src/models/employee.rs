//! Employee record
//!
//! The single resource exposed by the API. Every field is nullable on the
//! wire so that any well-formed JSON object is accepted as a body.

use serde::{Deserialize, Serialize};

/// Identifier type for employee records.
pub type EmployeeId = i64;

/// An employee record as stored and exchanged over HTTP.
///
/// # Fields
/// - `id`: Assigned by the store on creation; ignored or used as an upsert key on input
/// - `name`: Display name
/// - `salary`: Salary amount, no range constraint
/// - `department`: Department name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Employee {
    /// Creates an employee without an id, ready to be saved.
    pub fn new(name: impl Into<String>, salary: f64, department: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            salary: Some(salary),
            department: Some(department.into()),
        }
    }

    /// Returns the same record carrying the given id.
    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self
    }
}
