// Run artifacts: the result log and failure screenshots

pub mod results;
pub mod screenshots;

pub use results::{ResultLog, ResultRecord};
pub use screenshots::{ScreenshotError, ScreenshotStore};
