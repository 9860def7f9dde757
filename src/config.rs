//! Run configuration. Defaults are the lab setup the checks were written
//! against; command-line flags override individual fields.

use crate::appium::Capabilities;
use crate::chatbot::{Check, ReplyTimeouts};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Appium server base URL
    pub server_url: String,
    pub capabilities: Capabilities,
    pub results_path: PathBuf,
    pub screenshot_dir: PathBuf,
    /// Timeout of ordinary element waits
    pub element_timeout: Duration,
    pub poll_interval: Duration,
    pub reply_timeouts: ReplyTimeouts,
    /// Per-request HTTP timeout; must exceed the server's slowest command (session start)
    pub http_timeout: Duration,
    /// Checks to run, in order
    pub checks: Vec<Check>,
    /// Exit non-zero when any check records FAIL
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:4723/".to_string(),
            capabilities: Capabilities::default(),
            results_path: PathBuf::from("target").join("kuber_results.csv"),
            screenshot_dir: PathBuf::from("target").join("screenshots"),
            element_timeout: Duration::from_secs(25),
            poll_interval: crate::appium::wait::DEFAULT_POLL_INTERVAL,
            reply_timeouts: ReplyTimeouts::default(),
            http_timeout: Duration::from_secs(120),
            checks: Check::ALL.to_vec(),
            strict: false,
        }
    }
}
