// Chat screen helpers. None of these fail: problems are logged and
// reported as "not opened" / "no reply" / empty text.
use super::locators;
use crate::appium::{AndroidKey, AppiumResult, ElementRef, UiDriver, Wait};
use std::time::Duration;

pub struct ChatScreen<'a, D: UiDriver> {
    driver: &'a D,
    element_timeout: Duration,
    poll_interval: Duration,
}

impl<'a, D: UiDriver> ChatScreen<'a, D> {
    pub fn new(driver: &'a D, element_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            driver,
            element_timeout,
            poll_interval,
        }
    }

    pub fn driver(&self) -> &'a D {
        self.driver
    }

    /// Wait used by the checks for ordinary element lookups.
    pub fn wait(&self) -> Wait<'a, D> {
        self.wait_for(self.element_timeout)
    }

    pub fn wait_for(&self, timeout: Duration) -> Wait<'a, D> {
        Wait::new(self.driver, timeout).with_poll_interval(self.poll_interval)
    }

    /// Tap the Kuber entry if it shows up as clickable within the element timeout.
    pub async fn open_kuber_if_needed(&self) -> bool {
        match self.wait().until_clickable(&locators::kuber_entry()).await {
            Ok(entry) => match self.driver.click(&entry).await {
                Ok(()) => {
                    log::debug!("Opened Kuber chat");
                    true
                }
                Err(e) => {
                    log::debug!("Kuber entry not tappable: {e}");
                    false
                }
            },
            Err(e) => {
                log::debug!("Kuber entry not found, assuming chat is open: {e}");
                false
            }
        }
    }

    /// Type `question` into the message box and submit it with Enter.
    pub async fn send_text_question(&self, question: &str) {
        if let Err(e) = self.try_send(question).await {
            log::warn!("Send failed: {e}");
        }
    }

    async fn try_send(&self, question: &str) -> AppiumResult<()> {
        let input = self.wait().until_visible(&locators::message_input()).await?;
        self.driver.click(&input).await?;
        self.driver.clear(&input).await?;
        self.driver.send_keys(&input, question).await?;
        self.driver.press_key(AndroidKey::Enter).await
    }

    /// First visible text that differs from `user_text`, if one shows up within `timeout`.
    pub async fn wait_for_bot_reply_after(&self, timeout: Duration, user_text: &str) -> Option<ElementRef> {
        match self
            .wait_for(timeout)
            .until_visible(&locators::bot_reply_after(user_text))
            .await
        {
            Ok(reply) => Some(reply),
            Err(e) => {
                log::debug!("No reply to '{user_text}': {e}");
                None
            }
        }
    }

    /// Trimmed element text. An empty text falls back to the `text` attribute;
    /// any error yields an empty string.
    pub async fn safe_get_text(&self, element: &ElementRef) -> String {
        let text = match self.driver.text(element).await {
            Ok(t) if !t.is_empty() => Some(t),
            Ok(_) => self.driver.attribute(element, "text").await.ok().flatten(),
            Err(_) => None,
        };
        text.map(|t| t.trim().to_string()).unwrap_or_default()
    }
}
