// In-memory UiDriver used by unit tests
use crate::appium::{AndroidKey, AppiumError, AppiumResult, ElementRef, Locator, UiDriver};
use std::collections::HashMap;
use std::sync::Mutex;

/// Smallest valid PNG (1x1, grayscale)
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A,
    0x7E, 0x9B, 0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
    0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
struct FakeElement {
    text: String,
    displayed: bool,
    enabled: bool,
}

#[derive(Default)]
struct FakeState {
    // locator display string -> element ids in screen order
    screen: HashMap<String, Vec<String>>,
    elements: HashMap<String, FakeElement>,
    // lookups remaining before a locator starts matching
    appear_after: HashMap<String, usize>,
    failing: HashMap<String, String>,
    screenshot_fails: bool,
    // visibility checks that still answer "stale element"
    stale_displays: usize,
    commands: Vec<String>,
    typed: Vec<String>,
    clicked: Vec<String>,
    quit_calls: usize,
}

#[derive(Default)]
pub struct FakeDriver {
    state: Mutex<FakeState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(self, locator: &Locator, text: &str, displayed: bool, enabled: bool) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let key = locator.to_string();
            let ids = state.screen.entry(key.clone()).or_default();
            let id = format!("{key}#{}", ids.len());
            ids.push(id.clone());
            state.elements.insert(
                id,
                FakeElement {
                    text: text.to_string(),
                    displayed,
                    enabled,
                },
            );
        }
        self
    }

    pub fn with_element(self, locator: &Locator, text: &str) -> Self {
        self.add(locator, text, true, true)
    }

    pub fn with_hidden_element(self, locator: &Locator) -> Self {
        self.add(locator, "", false, true)
    }

    pub fn with_disabled_element(self, locator: &Locator) -> Self {
        self.add(locator, "", true, false)
    }

    /// The locator only matches after `lookups` failed lookups.
    pub fn appearing_after(self, locator: &Locator, lookups: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .appear_after
            .insert(locator.to_string(), lookups);
        self
    }

    /// Lookups of `locator` fail with a non-transient command error.
    pub fn failing(self, locator: &Locator, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(locator.to_string(), message.to_string());
        self
    }

    /// The next `checks` visibility checks fail with a stale element error.
    pub fn going_stale(self, checks: usize) -> Self {
        self.state.lock().unwrap().stale_displays = checks;
        self
    }

    pub fn without_screenshots(self) -> Self {
        self.state.lock().unwrap().screenshot_fails = true;
        self
    }

    pub fn quit_calls(&self) -> usize {
        self.state.lock().unwrap().quit_calls
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.state.lock().unwrap().clicked.clone()
    }

    fn record(&self, command: String) {
        self.state.lock().unwrap().commands.push(command);
    }

    fn element(&self, element: &ElementRef) -> AppiumResult<FakeElement> {
        self.state
            .lock()
            .unwrap()
            .elements
            .get(element.id())
            .cloned()
            .ok_or_else(|| AppiumError::StaleElement {
                message: element.id().to_string(),
            })
    }
}

impl UiDriver for FakeDriver {
    fn session_id(&self) -> &str {
        "fake-session"
    }

    async fn find_elements(&self, locator: &Locator) -> AppiumResult<Vec<ElementRef>> {
        let key = locator.to_string();
        self.record(format!("find {key}"));
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.failing.get(&key) {
            return Err(AppiumError::Command {
                command: "find elements".to_string(),
                error: "unknown error".to_string(),
                message: message.clone(),
            });
        }
        if let Some(remaining) = state.appear_after.get_mut(&key)
            && *remaining > 0
        {
            *remaining -= 1;
            return Ok(Vec::new());
        }
        Ok(state
            .screen
            .get(&key)
            .map(|ids| ids.iter().cloned().map(ElementRef).collect())
            .unwrap_or_default())
    }

    async fn click(&self, element: &ElementRef) -> AppiumResult<()> {
        self.element(element)?;
        self.record(format!("click {}", element.id()));
        self.state
            .lock()
            .unwrap()
            .clicked
            .push(element.id().to_string());
        Ok(())
    }

    async fn clear(&self, element: &ElementRef) -> AppiumResult<()> {
        self.element(element)?;
        self.record(format!("clear {}", element.id()));
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> AppiumResult<()> {
        self.element(element)?;
        self.record(format!("type {text}"));
        self.state.lock().unwrap().typed.push(text.to_string());
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> AppiumResult<String> {
        Ok(self.element(element)?.text)
    }

    async fn attribute(&self, element: &ElementRef, name: &str) -> AppiumResult<Option<String>> {
        let el = self.element(element)?;
        Ok((name == "text").then_some(el.text))
    }

    async fn is_displayed(&self, element: &ElementRef) -> AppiumResult<bool> {
        {
            let mut state = self.state.lock().unwrap();
            if state.stale_displays > 0 {
                state.stale_displays -= 1;
                return Err(AppiumError::StaleElement {
                    message: format!("{} is no longer attached to the view hierarchy", element.id()),
                });
            }
        }
        Ok(self.element(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementRef) -> AppiumResult<bool> {
        Ok(self.element(element)?.enabled)
    }

    async fn press_key(&self, key: AndroidKey) -> AppiumResult<()> {
        self.record(format!("key {}", key.keycode()));
        Ok(())
    }

    async fn screenshot_bytes(&self) -> AppiumResult<Vec<u8>> {
        if self.state.lock().unwrap().screenshot_fails {
            return Err(AppiumError::ScreenshotDecode {
                description: "device went away".to_string(),
            });
        }
        Ok(TINY_PNG.to_vec())
    }

    async fn quit(&self) -> AppiumResult<()> {
        self.state.lock().unwrap().quit_calls += 1;
        Ok(())
    }
}
