// Bounded polling waits for elements to become visible or clickable
use super::error::{AppiumError, AppiumResult};
use super::types::{ElementRef, Locator, UiDriver};
use std::fmt;
use tokio::time::{Duration, Instant, sleep};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// Stand-in deadline when `now + timeout` does not fit in an Instant
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Found and displayed
    Visible,
    /// Found, displayed and enabled
    Clickable,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Visible => write!(f, "visibility"),
            Condition::Clickable => write!(f, "clickability"),
        }
    }
}

pub struct Wait<'a, D: UiDriver> {
    driver: &'a D,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a, D: UiDriver> Wait<'a, D> {
    pub fn new(driver: &'a D, timeout: Duration) -> Self {
        Self {
            driver,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub async fn until_visible(&self, locator: &Locator) -> AppiumResult<ElementRef> {
        self.until(locator, Condition::Visible).await
    }

    pub async fn until_clickable(&self, locator: &Locator) -> AppiumResult<ElementRef> {
        self.until(locator, Condition::Clickable).await
    }

    /// Poll until `condition` holds for the first element matching `locator`.
    /// Missing and stale elements are retried; any other error ends the wait.
    pub async fn until(&self, locator: &Locator, condition: Condition) -> AppiumResult<ElementRef> {
        let start = Instant::now();
        let deadline = start
            .checked_add(self.timeout)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut last_error: Option<AppiumError> = None;
        loop {
            match self.check(locator, condition).await {
                Ok(Some(element)) => return Ok(element),
                Ok(None) => {}
                Err(e) if e.is_transient_lookup() => last_error = Some(e),
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                let cause = last_error
                    .map(|e| format!(" (last error: {e})"))
                    .unwrap_or_default();
                return Err(AppiumError::Timeout {
                    duration: self.timeout,
                    description: format!("waiting for {condition} of {locator}{cause}"),
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn check(&self, locator: &Locator, condition: Condition) -> AppiumResult<Option<ElementRef>> {
        let element = self.driver.find_element(locator).await?;
        if !self.driver.is_displayed(&element).await? {
            return Ok(None);
        }
        if condition == Condition::Clickable && !self.driver.is_enabled(&element).await? {
            return Ok(None);
        }
        Ok(Some(element))
    }
}
