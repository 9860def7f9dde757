// Appium module - W3C WebDriver client for the UiAutomator2 driver
// Provides the session used by the chatbot checks plus a polling wait.

pub mod error;
pub mod session;
pub mod types;
pub mod wait;


pub use error::{AppiumError, AppiumResult};
pub use session::AppiumSession;
pub use types::{AndroidKey, Capabilities, ElementRef, Locator, ScreenCapture, UiDriver};
pub use wait::{Condition, Wait};
