use crate::domain::model::AccountingInfo;
use crate::domain::ports::AccountingStore;
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store, kept in insertion order. Contents are lost on exit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<AccountingInfo>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountingStore for InMemoryStore {
    async fn create(&self, record: &AccountingInfo) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();

        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.records.write().await.push(stored);

        tracing::debug!("Stored accounting info {} in memory", id);
        Ok(id)
    }

    async fn get(&self, id: &str) -> StoreResult<AccountingInfo> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn list(
        &self,
        account_name: &str,
        page: u32,
        page_size: u32,
    ) -> StoreResult<Vec<AccountingInfo>> {
        let skip = (page.max(1) as usize - 1).saturating_mul(page_size as usize);

        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.account_name == account_name)
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}
