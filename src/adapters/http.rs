use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRY_COUNT: u32 = 3;
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(100);

/// Per-client transport settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    pub timeout: Duration,
    /// Extra attempts after the first one fails at the transport level.
    pub retry_count: u32,
    pub retry_wait: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait: DEFAULT_RETRY_WAIT,
        }
    }
}

/// A `reqwest::Client` with a fixed timeout and a blind, count-bounded retry.
///
/// Any request that fails before a response arrives (connect error, timeout)
/// is sent again, whatever its method. A non-2xx response is a response and is
/// returned as-is. Retrying a non-idempotent request whose first attempt timed
/// out after the server accepted it can duplicate the write.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: Client,
    settings: TransportSettings,
}

impl RetryingClient {
    pub fn new(settings: TransportSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.client.put(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        let mut attempt: u32 = 0;

        loop {
            // Streaming bodies cannot be replayed; send those once.
            let Some(current) = request.try_clone() else {
                return request.send().await;
            };

            match current.send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.settings.retry_count => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 Ledger request failed ({}), retry {}/{}",
                        e,
                        attempt,
                        self.settings.retry_count
                    );
                    if !self.settings.retry_wait.is_zero() {
                        tokio::time::sleep(self.settings.retry_wait).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
