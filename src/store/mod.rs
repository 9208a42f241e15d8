//! Employee Store Module
//!
//! Persistence port for employee records and its in-memory implementation.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Employee, EmployeeId};

pub use memory::InMemoryEmployeeStore;

// == Store Error ==
/// Failures raised by a store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other storage failure
    #[error("Store failure: {0}")]
    Internal(String),
}

// == Employee Store ==
/// Persistence operations consumed by the employee handlers.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Returns every stored employee, ordered by id.
    async fn retrieve_all(&self) -> Result<Vec<Employee>, StoreError>;

    /// Looks up a single employee.
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Inserts or replaces a record, keyed by its id.
    ///
    /// A record without an id receives the next free one. The stored record
    /// is returned.
    async fn save(&self, employee: Employee) -> Result<Employee, StoreError>;

    /// Removes a record, returning whether it existed.
    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, StoreError>;
}
