use std::time::Duration;

use backon::{BlockingRetryable, ExponentialBuilder};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{AiConfig, RetryConfig};
use crate::error::ProviderError;

/// Longest error body kept in `ProviderError::Http`.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Blocking JSON-over-HTTPS transport shared by the provider clients.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_secs: u64,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64, retry: RetryConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("melon-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
            retry,
        })
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, ProviderError> {
        Self::new(config.request_timeout_secs, config.retry.clone())
    }

    /// POST `body` as JSON and decode the JSON reply.
    ///
    /// Retries transient failures when the retry policy allows it.
    pub fn post_json<Req, Resp>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Req,
    ) -> Result<Resp, ProviderError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        if self.retry.max_retries == 0 {
            return self.send_once(url, headers, body);
        }

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.retry.min_delay_ms))
            .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .with_max_times(self.retry.max_retries)
            .with_jitter();

        (|| self.send_once(url, headers, body))
            .retry(backoff)
            .sleep(std::thread::sleep)
            .when(|e: &ProviderError| e.should_retry())
            .notify(|e: &ProviderError, dur: Duration| {
                warn!(
                    "Provider call failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .call()
    }

    fn send_once<Req, Resp>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Req,
    ) -> Result<Resp, ProviderError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let res = request
            .send()
            .map_err(|e| map_reqwest_error(e, self.timeout_secs))?;
        let status = res.status();
        debug!(url, status = status.as_u16(), "Provider responded");

        if status.is_success() {
            let text = res
                .text()
                .map_err(|e| map_reqwest_error(e, self.timeout_secs))?;
            return serde_json::from_str(&text)
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()));
        }

        let body = res.text().unwrap_or_default();
        Err(error_for_status(status, &body))
    }
}

/// Classify a non-2xx reply.
pub fn error_for_status(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Unauthorized(status.as_u16())
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        s => ProviderError::Http {
            status: s.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        },
    }
}

fn map_reqwest_error(e: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::Transport(e.to_string())
    }
}
