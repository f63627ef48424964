use crate::error::ScanError;
use crate::providers::{ContentPart, GenerativeModel};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Injectable delay so tests can substitute a counting stub for the
/// wall-clock sleep.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production delay backed by the tokio timer. Suspends the calling task
/// without blocking the runtime.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        sleep(duration).await;
    }
}

/// Invoke the model, retrying rate-limited failures with exponential
/// backoff.
///
/// Only errors matching the rate-limit signature are retried; anything
/// else propagates immediately after the first attempt. Backoff sleeps
/// 2^(attempt+1) seconds: 2s after the first failure, 4s after the
/// second, and so on. After exhausting `max_retries` attempts the last
/// error is returned.
pub async fn generate_with_retry(
    model: &dyn GenerativeModel,
    parts: &[ContentPart],
    max_retries: u32,
    delay: &dyn Delay,
) -> Result<String, ScanError> {
    let attempts = max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        debug!(
            "Calling {} (attempt {}/{})",
            model.model_name(),
            attempt + 1,
            attempts
        );

        match model.generate(parts).await {
            Ok(text) => return Ok(text),
            Err(err) if err.is_rate_limit() => {
                warn!(
                    "{} rate limited (attempt {}/{}): {}",
                    model.model_name(),
                    attempt + 1,
                    attempts,
                    err
                );
                let retries_remain = attempt + 1 < attempts;
                last_error = Some(err);
                if retries_remain {
                    let backoff = Duration::from_secs(1 << (attempt + 1));
                    debug!("Waiting {:?} before retry", backoff);
                    delay.sleep(backoff).await;
                }
            }
            // Non-rate-limit errors are not retried
            Err(err) => return Err(err),
        }
    }

    Err(last_error.expect("loop runs at least once"))
}
