use crate::domain::model::AccountingInfo;
use crate::utils::error::StoreResult;
use async_trait::async_trait;

/// Persistence backend for accounting info.
///
/// Implementations must be safe to share across concurrent requests; the
/// service holds them behind an `Arc<dyn AccountingStore>`.
#[async_trait]
pub trait AccountingStore: Send + Sync {
    /// Persists a validated record and returns the id the backend assigned to it.
    async fn create(&self, record: &AccountingInfo) -> StoreResult<String>;

    /// Fetches one record by id. Backends that cannot do this return
    /// `StoreError::Unsupported`.
    async fn get(&self, id: &str) -> StoreResult<AccountingInfo>;

    /// Lists records whose `accountName` equals `account_name` exactly.
    ///
    /// `page` is 1-based. Ordering is backend-defined and a page past the end
    /// yields an empty list.
    async fn list(
        &self,
        account_name: &str,
        page: u32,
        page_size: u32,
    ) -> StoreResult<Vec<AccountingInfo>>;
}
