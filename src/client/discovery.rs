//! Ordered "first one that works" probing.

use std::fmt;
use std::future::Future;

/// Try `candidates` in order and return the first success.
///
/// Failures are logged and swallowed. When every candidate fails, the last
/// failure is returned (`None` only for an empty list).
///
/// # Errors
///
/// Returns the last candidate's failure when none succeeds.
pub async fn try_in_order<'c, C, T, E, F, Fut>(
    candidates: &'c [C],
    mut attempt: F,
) -> Result<(&'c C, T), Option<E>>
where
    C: fmt::Display,
    E: fmt::Display,
    F: FnMut(&C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_failure = None;

    for (index, candidate) in candidates.iter().enumerate() {
        match attempt(candidate).await {
            Ok(value) => {
                tracing::debug!(candidate = %candidate, index, "Candidate succeeded");
                return Ok((candidate, value));
            }
            Err(e) => {
                tracing::warn!(candidate = %candidate, index, error = %e, "Candidate failed");
                last_failure = Some(e);
            }
        }
    }

    Err(last_failure)
}
