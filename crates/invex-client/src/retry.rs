use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const BASE_BACKOFF_SECS: u64 = 1;
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// `Retry-After` in whole seconds, capped at `MAX_RETRY_AFTER_SECS`.
fn retry_after(value: &reqwest::header::HeaderValue) -> Option<Duration> {
    let secs = value.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)))
}

/// Honor `Retry-After` when present, else back off exponentially.
fn retry_delay(response: &reqwest::Response, attempt: u32) -> Duration {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(retry_after)
        .unwrap_or_else(|| Duration::from_secs(BASE_BACKOFF_SECS << attempt.min(6)))
}

/// Send a request, retrying up to `max_retries` times while the backend answers 429.
///
/// Any other status is handed back to the caller untouched.
///
/// # Errors
///
/// Returns `ClientError::RateLimited` once every attempt has been rate limited, or
/// `ClientError::Http` for transport failures.
pub(crate) async fn send_with_retry<F, Fut>(
    endpoint: &str,
    max_retries: u32,
    mut f: F,
) -> Result<reqwest::Response, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..=max_retries {
        let response = f().await.map_err(ClientError::Http)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if attempt == max_retries {
                return Err(ClientError::RateLimited);
            }
            let delay = retry_delay(&response, attempt);
            tracing::warn!(
                endpoint,
                delay_secs = delay.as_secs(),
                "rate limited, retrying ({}/{max_retries})",
                attempt + 1
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        return Ok(response);
    }

    Err(ClientError::RateLimited)
}
