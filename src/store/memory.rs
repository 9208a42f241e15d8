//! In-Memory Employee Store
//!
//! BTreeMap-backed `EmployeeStore` with a monotonically increasing id sequence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Employee, EmployeeId};
use crate::store::{EmployeeStore, StoreError};

#[derive(Debug)]
struct StoreState {
    /// Records keyed by id, iteration order is id order
    employees: BTreeMap<EmployeeId, Employee>,
    /// Next id handed out to a record saved without one
    next_id: EmployeeId,
}

// == In-Memory Employee Store ==
/// Thread-safe in-process employee storage.
#[derive(Debug)]
pub struct InMemoryEmployeeStore {
    state: RwLock<StoreState>,
}

impl InMemoryEmployeeStore {
    // == Constructor ==
    /// Creates an empty store whose first assigned id is 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                employees: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a store pre-populated with the given records.
    ///
    /// Records are saved in order, so those without an id are numbered
    /// after any explicit ids seen before them.
    pub async fn with_employees(
        employees: impl IntoIterator<Item = Employee>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        for employee in employees {
            store.save(employee).await?;
        }
        Ok(store)
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.state.read().await.employees.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryEmployeeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn retrieve_all(&self) -> Result<Vec<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(state.employees.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(state.employees.get(&id).cloned())
    }

    async fn save(&self, mut employee: Employee) -> Result<Employee, StoreError> {
        let mut state = self.state.write().await;

        let id = match employee.id {
            Some(id) => id,
            None => state.next_id,
        };
        let next_id = id.checked_add(1).ok_or_else(|| {
            StoreError::Internal(format!("Employee id {} exhausts the id sequence", id))
        })?;
        state.next_id = state.next_id.max(next_id);

        employee.id = Some(id);
        let replaced = state.employees.insert(id, employee.clone()).is_some();
        debug!(id, replaced, "Employee saved");

        Ok(employee)
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.employees.remove(&id).is_some())
    }
}
