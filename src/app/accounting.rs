use crate::domain::model::{AccountingInfo, AccountingInfoRequest};
use crate::domain::ports::AccountingStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// Use cases for accounting info: validate-then-store, and list by account.
#[derive(Clone)]
pub struct AccountingService {
    store: Arc<dyn AccountingStore>,
}

impl AccountingService {
    pub fn new(store: Arc<dyn AccountingStore>) -> Self {
        Self { store }
    }

    /// Validates the draft and, only if it is valid, stores it with a single
    /// `create` call. Returns the id assigned by the store.
    pub async fn store_accounting_info(&self, request: AccountingInfoRequest) -> Result<String> {
        let record = request.into_record()?;

        let id = self.store.create(&record).await?;
        tracing::info!("✅ Stored accounting info {} for '{}'", id, record.account_name);
        Ok(id)
    }

    pub async fn list_accounting_info(
        &self,
        account_name: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<AccountingInfo>> {
        let records = self.store.list(account_name, page, page_size).await?;
        Ok(records)
    }
}
