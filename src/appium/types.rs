// Core automation types and the driver trait
use super::error::{AppiumError, AppiumResult};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// How an element is located on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    UiAutomator(String),
    XPath(String),
}

impl Locator {
    /// W3C strategy name understood by the UiAutomator2 driver
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Id(_) => "id",
            Locator::UiAutomator(_) => "-android uiautomator",
            Locator::XPath(_) => "xpath",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v) | Locator::UiAutomator(v) | Locator::XPath(v) => v,
        }
    }

    pub fn to_request(&self) -> Value {
        json!({ "using": self.strategy(), "value": self.value() })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Server-side handle of a located element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
    /// W3C element identifier key; Appium also sends the legacy `ELEMENT` key.
    pub const W3C_KEY: &'static str = "element-6066-11e4-a23f-4f4ca97fd7ad";

    pub fn from_value(value: &Value) -> Option<Self> {
        value
            .get(Self::W3C_KEY)
            .or_else(|| value.get("ELEMENT"))
            .and_then(Value::as_str)
            .map(|id| ElementRef(id.to_string()))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Android key codes pressed by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidKey {
    Enter,
}

impl AndroidKey {
    pub fn keycode(self) -> u32 {
        match self {
            AndroidKey::Enter => 66,
        }
    }
}

/// Session capabilities for the UiAutomator2 driver.
/// Serialized as W3C `alwaysMatch`; everything except `platformName` carries the `appium:` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capabilities {
    #[serde(rename = "platformName")]
    pub platform_name: String,
    #[serde(rename = "appium:automationName")]
    pub automation_name: String,
    #[serde(rename = "appium:deviceName")]
    pub device_name: String,
    #[serde(rename = "appium:udid")]
    pub udid: String,
    #[serde(rename = "appium:noReset")]
    pub no_reset: bool,
    #[serde(rename = "appium:autoGrantPermissions")]
    pub auto_grant_permissions: bool,
    #[serde(rename = "appium:appPackage")]
    pub app_package: String,
    #[serde(rename = "appium:appActivity")]
    pub app_activity: String,
    #[serde(rename = "appium:newCommandTimeout")]
    pub new_command_timeout_secs: u64,
}

/// Body of `POST /session`.
#[derive(Debug, Serialize)]
pub struct NewSessionRequest<'a> {
    pub capabilities: W3cCapabilities<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct W3cCapabilities<'a> {
    pub always_match: &'a Capabilities,
    pub first_match: Vec<serde_json::Map<String, Value>>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            platform_name: "Android".to_string(),
            automation_name: "UiAutomator2".to_string(),
            device_name: "Moto G74".to_string(),
            udid: "ZD2229BTDK".to_string(),
            no_reset: true,
            auto_grant_permissions: true,
            app_package: "com.simplifymoney".to_string(),
            app_activity: "com.simplifymoney.MainActivityDiwali".to_string(),
            new_command_timeout_secs: 300,
        }
    }
}

impl Capabilities {
    pub fn to_new_session_body(&self) -> NewSessionRequest<'_> {
        NewSessionRequest {
            capabilities: W3cCapabilities {
                always_match: self,
                first_match: vec![serde_json::Map::new()],
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenCapture {
    pub bytes: Vec<u8>,
    pub duration_ms: u128,
}

// Trait defining what the checks need from an automation session
#[allow(async_fn_in_trait)]
pub trait UiDriver {
    fn session_id(&self) -> &str;

    async fn find_elements(&self, locator: &Locator) -> AppiumResult<Vec<ElementRef>>;

    async fn find_element(&self, locator: &Locator) -> AppiumResult<ElementRef> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppiumError::NoSuchElement {
                locator: locator.to_string(),
                message: "no matching element on screen".to_string(),
            })
    }

    async fn click(&self, element: &ElementRef) -> AppiumResult<()>;
    async fn clear(&self, element: &ElementRef) -> AppiumResult<()>;
    async fn send_keys(&self, element: &ElementRef, text: &str) -> AppiumResult<()>;
    async fn text(&self, element: &ElementRef) -> AppiumResult<String>;
    async fn attribute(&self, element: &ElementRef, name: &str) -> AppiumResult<Option<String>>;
    async fn is_displayed(&self, element: &ElementRef) -> AppiumResult<bool>;
    async fn is_enabled(&self, element: &ElementRef) -> AppiumResult<bool>;
    async fn press_key(&self, key: AndroidKey) -> AppiumResult<()>;

    // Raw PNG (or whatever the server encodes) bytes
    async fn screenshot_bytes(&self) -> AppiumResult<Vec<u8>>;

    async fn screen_capture(&self) -> AppiumResult<ScreenCapture> {
        let start = std::time::Instant::now();
        let bytes = self.screenshot_bytes().await?;
        Ok(ScreenCapture {
            bytes,
            duration_ms: start.elapsed().as_millis(),
        })
    }

    async fn quit(&self) -> AppiumResult<()>;
}
