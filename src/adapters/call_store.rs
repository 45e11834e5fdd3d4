use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{CallPort, CallRecord};

/// Call records kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryCallStore {
    calls: Arc<RwLock<HashMap<Uuid, CallRecord>>>,
}

impl InMemoryCallStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl CallPort for InMemoryCallStore {
    async fn list_calls(&self, product_id: &str) -> anyhow::Result<Vec<CallRecord>> {
        let calls = self.calls.read().await;
        let mut records: Vec<CallRecord> = calls
            .values()
            .filter(|c| c.product_id == product_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.made_on.cmp(&a.made_on));
        Ok(records)
    }

    async fn get_call(&self, id: Uuid) -> anyhow::Result<Option<CallRecord>> {
        let calls = self.calls.read().await;
        Ok(calls.get(&id).cloned())
    }

    async fn save_call(&self, record: CallRecord) -> anyhow::Result<()> {
        let mut calls = self.calls.write().await;
        calls.insert(record.id, record);
        Ok(())
    }
}
