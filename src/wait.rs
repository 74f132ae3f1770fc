use crate::browser::Browser;
use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// How a bounded wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition was observed
    Ready,
    /// The timeout elapsed first
    TimedOut,
}

/// Polls `check` every `interval` until it returns true or `timeout` elapses.
///
/// The check always runs at least once. Check errors end the wait immediately.
pub async fn until<F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut check: F,
) -> Result<WaitOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if check().await? {
            return Ok(WaitOutcome::Ready);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(WaitOutcome::TimedOut);
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Waits until the document height stops changing between two polls, bounded by `timeout`
pub async fn settle<B: Browser>(
    browser: &B,
    timeout: Duration,
    interval: Duration,
) -> Result<WaitOutcome> {
    let deadline = Instant::now() + timeout;
    let mut last = browser.page_height().await?;

    loop {
        let now = Instant::now();
        if now >= deadline {
            ::log::debug!("Page still growing after {:?} (height {})", timeout, last);
            return Ok(WaitOutcome::TimedOut);
        }
        sleep(interval.min(deadline - now)).await;

        let height = browser.page_height().await?;
        if height == last {
            ::log::trace!("Page settled at height {}", height);
            return Ok(WaitOutcome::Ready);
        }
        last = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockBrowser;
    use crate::error::HarvestError;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_until_ready_after_a_few_polls() {
        let polls = Cell::new(0);
        let outcome = until(Duration::from_secs(5), Duration::from_millis(1), || {
            polls.set(polls.get() + 1);
            let ready = polls.get() >= 3;
            async move { Ok::<_, HarvestError>(ready) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, WaitOutcome::Ready);
        assert_eq!(polls.get(), 3);
    }

    #[tokio::test]
    async fn test_until_times_out() {
        let outcome = until(Duration::from_millis(20), Duration::from_millis(5), || async {
            Ok::<_, HarvestError>(false)
        })
        .await
        .unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_until_zero_timeout_checks_once() {
        let polls = Cell::new(0);
        let outcome = until(Duration::ZERO, Duration::from_millis(5), || {
            polls.set(polls.get() + 1);
            async { Ok::<_, HarvestError>(false) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(polls.get(), 1);
    }

    #[tokio::test]
    async fn test_settle_on_stable_page() {
        let browser = MockBrowser::new("");
        let outcome = settle(&browser, Duration::from_secs(1), Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Ready);
    }
}
