//! Wait-for-condition pollers
//!
//! Bounded polling loops used by the apply and delete paths. Both are
//! generic over an async probe so they can be driven in tests without a
//! cluster; `ResourceClient` supplies the real `Get`-based probes.
//!
//! Timing semantics, shared by both loops:
//! - a zero timeout means "check once, don't wait": one probe, then an
//!   immediate successful return regardless of the outcome
//! - once elapsed wall-clock time reaches the timeout the wait fails with
//!   `ClientError::WaitTimeout`
//! - between attempts the calling task sleeps for the poll interval
//!
//! There is no cancellation token; a loop ends only by success or timeout.

use serde_json::Value as JsonValue;
use std::future::Future;
use std::time::Instant;

use kubestate_core::{UpsertWait, WaitConfig};

use crate::error::{ClientError, Result};

/// Outcome of one existence probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Gone,
}

/// Poll until the object is confirmed gone.
///
/// A probe error is indistinguishable from presence here: transient API
/// failures (throttling included) keep the loop polling rather than
/// aborting the wait, so only not-found or the timeout ends it.
pub async fn wait_for_delete<F, Fut>(mut probe: F, config: &WaitConfig) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Presence>>,
{
    let started = Instant::now();
    loop {
        match probe().await {
            Ok(Presence::Gone) => return Ok(()),
            Ok(Presence::Present) => {}
            Err(e) => tracing::debug!("existence probe failed, still polling: {}", e),
        }

        if config.is_check_once() {
            return Ok(());
        }
        if started.elapsed() >= config.timeout {
            return Err(ClientError::WaitTimeout {
                timeout: config.timeout,
            });
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}

/// Poll until every field matcher matches the live object.
///
/// An object that cannot be fetched counts as not-yet-matching. With no
/// matchers configured the wait succeeds without probing.
pub async fn wait_for_upsert<F, Fut>(mut probe: F, wait: &UpsertWait) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JsonValue>>,
{
    if wait.fields.is_empty() {
        return Ok(());
    }

    let started = Instant::now();
    loop {
        match probe().await {
            Ok(obj) => {
                let mut matched = true;
                for field in &wait.fields {
                    if !field.matches(&obj)? {
                        matched = false;
                        break;
                    }
                }
                if matched {
                    return Ok(());
                }
            }
            Err(e) => tracing::debug!("object fetch failed while waiting: {}", e),
        }

        if wait.config.is_check_once() {
            return Ok(());
        }
        if started.elapsed() >= wait.config.timeout {
            return Err(ClientError::WaitTimeout {
                timeout: wait.config.timeout,
            });
        }
        tokio::time::sleep(wait.config.poll_interval).await;
    }
}
