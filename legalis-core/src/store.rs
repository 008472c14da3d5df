use crate::CollaboratorError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Persistence seam for orders.
///
/// The engine itself never talks to storage; callers load a snapshot, run
/// the pure engine functions over it, and write the resulting patch back.
/// Snapshots and patches travel as JSON documents so the store does not
/// depend on the engine's model types. Patches are shallow field merges,
/// never transactional multi-document writes.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<serde_json::Value>, CollaboratorError>;

    async fn patch(&self, id: Uuid, patch: serde_json::Value) -> Result<(), CollaboratorError>;
}

/// In-memory store for tests
#[derive(Default)]
pub struct MockOrderStore {
    orders: Mutex<HashMap<Uuid, serde_json::Value>>,
}

impl MockOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: Uuid, order: serde_json::Value) {
        self.orders.lock().unwrap().insert(id, order);
    }
}

#[async_trait]
impl OrderStore for MockOrderStore {
    async fn load(&self, id: Uuid) -> Result<Option<serde_json::Value>, CollaboratorError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn patch(&self, id: Uuid, patch: serde_json::Value) -> Result<(), CollaboratorError> {
        let mut orders = self.orders.lock().unwrap();
        let entry = orders
            .get_mut(&id)
            .ok_or_else(|| format!("order not found: {id}"))?;
        if let (Some(target), Some(fields)) = (entry.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}
