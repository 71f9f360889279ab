//! immudb Vault backend.
//!
//! Speaks the Vault document REST API for a single ledger/collection pair.
//! Documents are created with `PUT .../document` and listed through
//! `POST .../documents/search` with an `accountName` equality query.

use crate::adapters::http::{RetryingClient, TransportSettings};
use crate::domain::model::AccountingInfo;
use crate::domain::ports::AccountingStore;
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://vault.immudb.io/ics/api/v1";

const STORE_DOCUMENT_PATH: &str = "/document";
const SEARCH_DOCUMENTS_PATH: &str = "/documents/search";
const ACCOUNT_NAME_FIELD: &str = "accountName";
const OPERATOR_EQ: &str = "EQ";

#[derive(Debug, Clone)]
pub struct VaultSettings {
    pub api_base: String,
    pub ledger: String,
    pub collection: String,
    pub api_key: String,
    pub transport: TransportSettings,
}

impl VaultSettings {
    pub fn new(ledger: &str, collection: &str, api_key: &str) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            ledger: ledger.to_string(),
            collection: collection.to_string(),
            api_key: api_key.to_string(),
            transport: TransportSettings::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    pub fn with_transport(mut self, transport: TransportSettings) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> String {
        format!(
            "{}/ledger/{}/collection/{}",
            self.api_base.trim_end_matches('/'),
            self.ledger,
            self.collection
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentResponse {
    #[serde(default)]
    transaction_id: String,
    document_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchDocumentsRequest<'a> {
    query: Query<'a>,
    page: u32,
    per_page: u32,
}

#[derive(Debug, Serialize)]
struct Query<'a> {
    expressions: Vec<Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Expression<'a> {
    field_comparisons: Vec<FieldComparison<'a>>,
}

#[derive(Debug, Serialize)]
struct FieldComparison<'a> {
    field: &'a str,
    operator: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchDocumentsResponse {
    // Vault sends `null` as well as omitting the key when nothing matched.
    #[serde(default)]
    revisions: Option<Vec<Revision>>,
}

/// Documents are decoded one by one so a single foreign document in the
/// collection does not fail the whole page.
#[derive(Debug, Deserialize)]
struct Revision {
    #[serde(default)]
    document: serde_json::Value,
}

impl<'a> SearchDocumentsRequest<'a> {
    fn by_account_name(account_name: &'a str, page: u32, per_page: u32) -> Self {
        Self {
            query: Query {
                expressions: vec![Expression {
                    field_comparisons: vec![FieldComparison {
                        field: ACCOUNT_NAME_FIELD,
                        operator: OPERATOR_EQ,
                        value: account_name,
                    }],
                }],
            },
            page,
            per_page,
        }
    }
}

/// Vault-backed [`AccountingStore`]. Cheap to share: it only holds immutable
/// settings and a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct VaultStore {
    base_url: String,
    api_key: String,
    client: RetryingClient,
}

impl VaultStore {
    pub fn new(settings: VaultSettings) -> StoreResult<Self> {
        let client = RetryingClient::new(settings.transport)?;

        Ok(Self {
            base_url: settings.base_url(),
            api_key: settings.api_key,
            client,
        })
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .header("Content-Type", "application/json")
    }

    async fn check_status(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("❌ Vault returned code: {}, resp: {}", status.as_u16(), body);
        Err(StoreError::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl AccountingStore for VaultStore {
    async fn create(&self, record: &AccountingInfo) -> StoreResult<String> {
        let url = format!("{}{}", self.base_url, STORE_DOCUMENT_PATH);
        tracing::debug!("Storing document at: {}", url);

        let request = self.with_headers(self.client.put(&url)).json(record);
        let response = Self::check_status(self.client.send(request).await?).await?;

        let created: CreateDocumentResponse = response.json().await?;
        tracing::debug!(
            "Vault assigned document id {} (transaction {})",
            created.document_id,
            created.transaction_id
        );
        Ok(created.document_id)
    }

    async fn get(&self, id: &str) -> StoreResult<AccountingInfo> {
        tracing::error!("get({}) called on the vault store, which does not support it", id);
        Err(StoreError::Unsupported { operation: "get" })
    }

    async fn list(
        &self,
        account_name: &str,
        page: u32,
        page_size: u32,
    ) -> StoreResult<Vec<AccountingInfo>> {
        let url = format!("{}{}", self.base_url, SEARCH_DOCUMENTS_PATH);
        tracing::debug!(
            "Searching documents at: {} (accountName={}, page={}, perPage={})",
            url,
            account_name,
            page,
            page_size
        );

        let body = SearchDocumentsRequest::by_account_name(account_name, page, page_size);
        let request = self.with_headers(self.client.post(&url)).json(&body);
        let response = Self::check_status(self.client.send(request).await?).await?;

        let found: SearchDocumentsResponse = response.json().await?;
        let revisions = found.revisions.unwrap_or_default();
        tracing::debug!("Vault returned {} revisions", revisions.len());

        Ok(revisions
            .into_iter()
            .filter_map(|revision| {
                match serde_json::from_value::<AccountingInfo>(revision.document) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!("⚠️ Skipping undecodable document: {}", e);
                        None
                    }
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Direction;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    const BASE_PATH: &str = "/ledger/test-ledger/collection/test-collection";

    fn store_for(server: &MockServer) -> VaultStore {
        let settings = VaultSettings::new("test-ledger", "test-collection", "test-key")
            .with_api_base(&server.base_url())
            .with_transport(TransportSettings {
                timeout: Duration::from_millis(500),
                retry_count: 0,
                retry_wait: Duration::ZERO,
            });
        VaultStore::new(settings).unwrap()
    }

    fn record() -> AccountingInfo {
        AccountingInfo {
            id: None,
            account_number: "AC1".to_string(),
            account_name: "mario".to_string(),
            iban: "IBAN1".to_string(),
            address: "Rome".to_string(),
            amount: 10.0,
            direction: Direction::Receiving,
        }
    }

    #[test]
    fn test_base_url_template() {
        let settings = VaultSettings::new("my-ledger", "my-collection", "key");
        assert_eq!(
            settings.base_url(),
            "https://vault.immudb.io/ics/api/v1/ledger/my-ledger/collection/my-collection"
        );

        let local = settings.with_api_base("http://127.0.0.1:9000/");
        assert_eq!(
            local.base_url(),
            "http://127.0.0.1:9000/ledger/my-ledger/collection/my-collection"
        );
    }

    #[test]
    fn test_search_request_shape() {
        let body = SearchDocumentsRequest::by_account_name("acme", 5, 10);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "query": {
                    "expressions": [
                        {"fieldComparisons": [
                            {"field": "accountName", "operator": "EQ", "value": "acme"}
                        ]}
                    ]
                },
                "page": 5,
                "perPage": 10
            })
        );
    }

    #[tokio::test]
    async fn test_create_puts_document_with_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path(format!("{}/document", BASE_PATH))
                .header("Accept", "application/json")
                .header("X-API-Key", "test-key")
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "accountNumber": "AC1",
                    "accountName": "mario",
                    "iban": "IBAN1",
                    "address": "Rome",
                    "amount": 10.0,
                    "type": "receiving"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"transactionId": "42", "documentId": "doc-1"}));
        });

        let id = store_for(&server).create(&record()).await.unwrap();

        mock.assert();
        assert_eq!(id, "doc-1");
    }

    #[tokio::test]
    async fn test_create_error_status_maps_to_remote() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path(format!("{}/document", BASE_PATH));
            then.status(401).body("{\"message\":\"unauthorized\"}");
        });

        let err = store_for(&server).create(&record()).await.unwrap_err();

        mock.assert_hits(1);
        match err {
            StoreError::Remote { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("unauthorized"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_undecodable_response_is_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path(format!("{}/document", BASE_PATH));
            then.status(200).body("not json");
        });

        let err = store_for(&server).create(&record()).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[tokio::test]
    async fn test_list_posts_search_and_unwraps_revisions() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("{}/documents/search", BASE_PATH))
                .header("X-API-Key", "test-key")
                .json_body(json!({
                    "query": {"expressions": [{"fieldComparisons": [
                        {"field": "accountName", "operator": "EQ", "value": "mario"}
                    ]}]},
                    "page": 1,
                    "perPage": 10
                }));
            then.status(200).json_body(json!({
                "revisions": [
                    {"document": {
                        "_id": "doc-1",
                        "accountNumber": "AC1",
                        "accountName": "mario",
                        "iban": "IBAN1",
                        "address": "Rome",
                        "amount": 10.0,
                        "type": "receiving"
                    }, "revision": "1", "transactionId": "42"},
                    {"document": {
                        "_id": "doc-2",
                        "accountNumber": "AC2",
                        "accountName": "mario",
                        "iban": "IBAN2",
                        "address": "Milan",
                        "amount": 5.5,
                        "type": "sending"
                    }, "revision": "1", "transactionId": "43"}
                ],
                "page": 1,
                "perPage": 10
            }));
        });

        let records = store_for(&server).list("mario", 1, 10).await.unwrap();

        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("doc-1"));
        assert_eq!(records[0].account_number, "AC1");
        assert_eq!(records[1].direction, Direction::Sending);
        assert_eq!(records[1].amount, 5.5);
    }

    #[tokio::test]
    async fn test_list_passes_pagination_verbatim() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(format!("{}/documents/search", BASE_PATH))
                .json_body_partial(r#"{"page": 5, "perPage": 10}"#);
            then.status(200).json_body(json!({"revisions": []}));
        });

        let records = store_for(&server).list("acme", 5, 10).await.unwrap();

        mock.assert();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_without_revisions_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(format!("{}/documents/search", BASE_PATH));
            then.status(200).json_body(json!({"page": 1, "perPage": 10}));
        });

        let records = store_for(&server).list("nobody", 1, 10).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_null_revisions_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(format!("{}/documents/search", BASE_PATH));
            then.status(200)
                .json_body(json!({"revisions": null, "page": 1, "perPage": 10}));
        });

        let records = store_for(&server).list("nobody", 1, 10).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_undecodable_documents() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(format!("{}/documents/search", BASE_PATH));
            then.status(200).json_body(json!({
                "revisions": [
                    {"document": {
                        "_id": "doc-1",
                        "accountNumber": "AC1",
                        "accountName": "mario",
                        "iban": "IBAN1",
                        "address": "Rome",
                        "amount": 3.0,
                        "type": "refund"
                    }},
                    {"document": {
                        "_id": "doc-2",
                        "accountNumber": "AC2",
                        "accountName": "mario",
                        "iban": "IBAN2",
                        "address": "Milan",
                        "amount": 5.5,
                        "type": "sending"
                    }},
                    {"revision": "3"}
                ]
            }));
        });

        let records = store_for(&server).list("mario", 1, 10).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("doc-2"));
    }

    #[tokio::test]
    async fn test_create_timeout_is_resent_every_attempt() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path(format!("{}/document", BASE_PATH));
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"transactionId": "1", "documentId": "doc-1"}));
        });

        let settings = VaultSettings::new("test-ledger", "test-collection", "test-key")
            .with_api_base(&server.base_url())
            .with_transport(TransportSettings {
                timeout: Duration::from_millis(200),
                retry_count: 2,
                retry_wait: Duration::ZERO,
            });
        let store = VaultStore::new(settings).unwrap();

        let err = store.create(&record()).await.unwrap_err();

        match err {
            StoreError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport error, got {:?}", other),
        }
        // the same document went out once per attempt
        mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_list_error_status_maps_to_remote() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(format!("{}/documents/search", BASE_PATH));
            then.status(500).body("boom");
        });

        let err = store_for(&server).list("mario", 1, 10).await.unwrap_err();
        assert!(matches!(err, StoreError::Remote { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_get_is_unsupported_and_sends_nothing() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let err = store_for(&server).get("doc-1").await.unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, StoreError::Unsupported { operation: "get" }));
        mock.assert_hits(0);
    }
}
