//! API Handlers
//!
//! HTTP request handlers for the employee endpoints plus the health and
//! cache statistics endpoints.
//!
//! The list handler reads through the `"employees"` cache region. Create,
//! update and delete evict that whole region once they produce a response;
//! a store fault propagates as a 500 and leaves the cache untouched.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info, warn};

use crate::cache::{get_or_compute, CacheProvider, ALL_EMPLOYEES_KEY, EMPLOYEES_REGION};
use crate::error::{ApiError, Result};
use crate::models::{Employee, EmployeeId, HealthResponse, StatsResponse};
use crate::store::EmployeeStore;

/// Body extractor that lets handlers answer malformed input themselves.
pub type EmployeePayload = std::result::Result<Json<Option<Employee>>, JsonRejection>;

/// Application state shared across all handlers.
///
/// Holds the injected store and list cache; the handlers themselves keep
/// no state between requests.
#[derive(Clone)]
pub struct AppState {
    /// Employee persistence
    pub store: Arc<dyn EmployeeStore>,
    /// Memoization for the list endpoint
    pub cache: Arc<dyn CacheProvider<Vec<Employee>>>,
}

impl AppState {
    /// Creates a new AppState from its collaborators.
    pub fn new(
        store: Arc<dyn EmployeeStore>,
        cache: Arc<dyn CacheProvider<Vec<Employee>>>,
    ) -> Self {
        Self { store, cache }
    }
}

/// Handler for GET /api/v1/employees
///
/// Returns every employee, served from the cache when possible.
pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>> {
    let employees = get_or_compute(
        state.cache.as_ref(),
        EMPLOYEES_REGION,
        ALL_EMPLOYEES_KEY,
        || state.store.retrieve_all(),
    )
    .await?;

    debug!(count = employees.len(), "Listed employees");
    Ok(Json(employees))
}

/// Handler for GET /api/v1/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Result<Json<Employee>> {
    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Handler for POST /api/v1/employees
///
/// Saves a new employee and answers 201 with an empty body.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: EmployeePayload,
) -> Result<StatusCode> {
    let outcome = save_new(&state, payload).await;
    evict_employees(&state, outcome).await
}

/// Handler for PUT /api/v1/employees/:id
///
/// Replaces an existing employee and answers 204 with an empty body.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: EmployeePayload,
) -> Result<StatusCode> {
    let outcome = replace_existing(&state, id, payload).await;
    evict_employees(&state, outcome).await
}

/// Handler for DELETE /api/v1/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Result<StatusCode> {
    let outcome = remove(&state, id).await;
    evict_employees(&state, outcome).await
}

/// Handler for GET /stats
///
/// Returns current list cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Operations ==

async fn save_new(state: &AppState, payload: EmployeePayload) -> Result<StatusCode> {
    let employee = require_body(payload)?;
    let saved = state.store.save(employee).await?;

    info!(id = ?saved.id, "Employee created");
    Ok(StatusCode::CREATED)
}

async fn replace_existing(
    state: &AppState,
    id: EmployeeId,
    payload: EmployeePayload,
) -> Result<StatusCode> {
    let mut employee = require_body(payload)?;

    if state.store.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(id));
    }

    if let Some(body_id) = employee.id.filter(|body_id| *body_id != id) {
        warn!(path_id = id, body_id, "Body id differs from path id, using path id");
    }
    employee.id = Some(id);
    state.store.save(employee).await?;

    info!(id, "Employee updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn remove(state: &AppState, id: EmployeeId) -> Result<StatusCode> {
    if state.store.delete_by_id(id).await? {
        info!(id, "Employee deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

fn require_body(payload: EmployeePayload) -> Result<Employee> {
    match payload {
        Ok(Json(Some(employee))) => Ok(employee),
        Ok(Json(None)) => Err(ApiError::BadRequest("Request body is null".to_string())),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// Clears the list cache unless the store faulted.
async fn evict_employees<T>(state: &AppState, outcome: Result<T>) -> Result<T> {
    if !matches!(outcome, Err(ApiError::Store(_))) {
        state.cache.evict_all(EMPLOYEES_REGION).await;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::Notify;

    use crate::cache::InMemoryCache;
    use crate::store::{InMemoryEmployeeStore, StoreError};

    /// Store double with canned answers that records every call.
    #[derive(Default)]
    struct RecordingStore {
        employees: Vec<Employee>,
        found: Option<Employee>,
        deleted: bool,
        failing: bool,
        retrieve_calls: Mutex<usize>,
        saved: Mutex<Vec<Employee>>,
    }

    impl RecordingStore {
        fn fault(&self) -> std::result::Result<(), StoreError> {
            if self.failing {
                Err(StoreError::Unavailable("database is down".to_string()))
            } else {
                Ok(())
            }
        }

        fn retrieve_calls(&self) -> usize {
            *self.retrieve_calls.lock().unwrap()
        }

        fn saved(&self) -> Vec<Employee> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeStore for RecordingStore {
        async fn retrieve_all(&self) -> std::result::Result<Vec<Employee>, StoreError> {
            *self.retrieve_calls.lock().unwrap() += 1;
            self.fault()?;
            Ok(self.employees.clone())
        }

        async fn find_by_id(
            &self,
            _id: EmployeeId,
        ) -> std::result::Result<Option<Employee>, StoreError> {
            self.fault()?;
            Ok(self.found.clone())
        }

        async fn save(&self, employee: Employee) -> std::result::Result<Employee, StoreError> {
            self.fault()?;
            self.saved.lock().unwrap().push(employee.clone());
            Ok(employee)
        }

        async fn delete_by_id(&self, _id: EmployeeId) -> std::result::Result<bool, StoreError> {
            self.fault()?;
            Ok(self.deleted)
        }
    }

    /// In-memory store whose next `retrieve_all` holds its snapshot until
    /// released, so a write can land between the read and the cache fill.
    #[derive(Default)]
    struct PausingStore {
        inner: InMemoryEmployeeStore,
        pause_next: AtomicBool,
        snapshot_taken: Notify,
        release: Notify,
    }

    #[async_trait]
    impl EmployeeStore for PausingStore {
        async fn retrieve_all(&self) -> std::result::Result<Vec<Employee>, StoreError> {
            let snapshot = self.inner.retrieve_all().await?;
            if self.pause_next.swap(false, Ordering::SeqCst) {
                self.snapshot_taken.notify_one();
                self.release.notified().await;
            }
            Ok(snapshot)
        }

        async fn find_by_id(
            &self,
            id: EmployeeId,
        ) -> std::result::Result<Option<Employee>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn save(&self, employee: Employee) -> std::result::Result<Employee, StoreError> {
            self.inner.save(employee).await
        }

        async fn delete_by_id(&self, id: EmployeeId) -> std::result::Result<bool, StoreError> {
            self.inner.delete_by_id(id).await
        }
    }

    fn state_with(store: Arc<RecordingStore>) -> (AppState, Arc<InMemoryCache<Vec<Employee>>>) {
        let cache = Arc::new(InMemoryCache::<Vec<Employee>>::new(300));
        (AppState::new(store, cache.clone()), cache)
    }

    fn john_doe() -> Employee {
        Employee {
            id: Some(1),
            name: Some("John Doe".to_string()),
            ..Default::default()
        }
    }

    async fn prime_cache(cache: &InMemoryCache<Vec<Employee>>) {
        cache
            .put(EMPLOYEES_REGION, ALL_EMPLOYEES_KEY, vec![john_doe()])
            .await;
    }

    async fn is_cached(cache: &InMemoryCache<Vec<Employee>>) -> bool {
        cache.get(EMPLOYEES_REGION, ALL_EMPLOYEES_KEY).await.is_some()
    }

    #[tokio::test]
    async fn test_list_returns_every_employee() {
        let store = Arc::new(RecordingStore {
            employees: vec![Employee::default(), Employee::default()],
            ..Default::default()
        });
        let (state, _) = state_with(store);

        let response = list_employees(State(state)).await.unwrap();
        assert_eq!(response.len(), 2);
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache() {
        let store = Arc::new(RecordingStore {
            employees: vec![john_doe()],
            ..Default::default()
        });
        let (state, _) = state_with(store.clone());

        list_employees(State(state.clone())).await.unwrap();
        list_employees(State(state)).await.unwrap();

        assert_eq!(store.retrieve_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_failure_is_not_cached() {
        let store = Arc::new(RecordingStore {
            failing: true,
            ..Default::default()
        });
        let (state, cache) = state_with(store.clone());

        let result = list_employees(State(state)).await;
        assert!(matches!(result, Err(ApiError::Store(_))));
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_list_snapshot_older_than_a_write_is_not_cached() {
        let store = Arc::new(PausingStore::default());
        store.pause_next.store(true, Ordering::SeqCst);
        let cache = Arc::new(InMemoryCache::<Vec<Employee>>::new(300));
        let state = AppState::new(store.clone(), cache);

        let in_flight = tokio::spawn(list_employees(State(state.clone())));
        store.snapshot_taken.notified().await;

        let status = create_employee(State(state.clone()), Ok(Json(Some(john_doe()))))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        store.release.notify_one();
        let stale = in_flight.await.unwrap().unwrap();
        assert!(stale.is_empty());

        let fresh = list_employees(State(state)).await.unwrap();
        assert_eq!(fresh.len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_cached_with_very_large_ttl() {
        let store = Arc::new(RecordingStore {
            employees: vec![john_doe()],
            ..Default::default()
        });
        let cache = Arc::new(InMemoryCache::<Vec<Employee>>::new(u64::MAX));
        let state = AppState::new(store.clone(), cache.clone());

        list_employees(State(state.clone())).await.unwrap();
        let response = list_employees(State(state)).await.unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(store.retrieve_calls(), 1);
        assert!(is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_get_employee_found() {
        let store = Arc::new(RecordingStore {
            found: Some(john_doe()),
            ..Default::default()
        });
        let (state, _) = state_with(store);

        let response = get_employee(State(state), Path(1)).await.unwrap();
        assert_eq!(response.id, Some(1));
        assert_eq!(response.name.as_deref(), Some("John Doe"));
    }

    #[tokio::test]
    async fn test_get_employee_not_found() {
        let (state, _) = state_with(Arc::new(RecordingStore::default()));

        let result = get_employee(State(state), Path(1)).await;
        assert!(matches!(result, Err(ApiError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_create_returns_created_and_evicts() {
        let store = Arc::new(RecordingStore::default());
        let (state, cache) = state_with(store.clone());
        prime_cache(&cache).await;

        let status = create_employee(State(state), Ok(Json(Some(Employee::default()))))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.saved().len(), 1);
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_create_null_body_is_bad_request_without_store_call() {
        let store = Arc::new(RecordingStore::default());
        let (state, cache) = state_with(store.clone());
        prime_cache(&cache).await;

        let result = create_employee(State(state), Ok(Json(None))).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.saved().is_empty());
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_create_store_failure_keeps_cache() {
        let store = Arc::new(RecordingStore {
            failing: true,
            ..Default::default()
        });
        let (state, cache) = state_with(store);
        prime_cache(&cache).await;

        let result = create_employee(State(state), Ok(Json(Some(john_doe())))).await;

        assert!(matches!(result, Err(ApiError::Store(_))));
        assert!(is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_update_existing_saves_body_with_path_id() {
        let store = Arc::new(RecordingStore {
            found: Some(john_doe()),
            ..Default::default()
        });
        let (state, cache) = state_with(store.clone());
        prime_cache(&cache).await;

        let body = Employee::new("John Doe", 9000.0, "Finance");
        let status = update_employee(State(state), Path(1), Ok(Json(Some(body.clone()))))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.saved(), vec![body.with_id(1)]);
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_update_overrides_conflicting_body_id() {
        let store = Arc::new(RecordingStore {
            found: Some(john_doe()),
            ..Default::default()
        });
        let (state, _) = state_with(store.clone());

        let body = john_doe().with_id(99);
        update_employee(State(state), Path(1), Ok(Json(Some(body))))
            .await
            .unwrap();

        assert_eq!(store.saved()[0].id, Some(1));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_without_save_and_still_evicts() {
        let store = Arc::new(RecordingStore::default());
        let (state, cache) = state_with(store.clone());
        prime_cache(&cache).await;

        let result = update_employee(State(state), Path(1), Ok(Json(Some(john_doe())))).await;

        assert!(matches!(result, Err(ApiError::NotFound(1))));
        assert!(store.saved().is_empty());
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_update_null_body_is_bad_request() {
        let store = Arc::new(RecordingStore {
            found: Some(john_doe()),
            ..Default::default()
        });
        let (state, cache) = state_with(store.clone());
        prime_cache(&cache).await;

        let result = update_employee(State(state), Path(1), Ok(Json(None))).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.saved().is_empty());
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let store = Arc::new(RecordingStore {
            deleted: true,
            ..Default::default()
        });
        let (state, cache) = state_with(store);
        prime_cache(&cache).await;

        let status = delete_employee(State(state), Path(1)).await.unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_and_still_evicts() {
        let (state, cache) = state_with(Arc::new(RecordingStore::default()));
        prime_cache(&cache).await;

        let result = delete_employee(State(state), Path(100)).await;

        assert!(matches!(result, Err(ApiError::NotFound(100))));
        assert!(!is_cached(&cache).await);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = state_with(Arc::new(RecordingStore::default()));

        list_employees(State(state.clone())).await.unwrap();
        list_employees(State(state.clone())).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
