// Suite orchestration: artifacts, session, checks in order, teardown once
use crate::appium::{AppiumError, AppiumSession, UiDriver};
use crate::chatbot::{ChatScreen, Check, ReplyTimeouts};
use crate::config::RunConfig;
use crate::report::{ResultLog, ResultRecord, ScreenshotStore};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Failed to prepare result log {path:?}: {source}")]
    ResultLog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to prepare screenshot directory {path:?}: {source}")]
    ScreenshotDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not start automation session: {source}")]
    Session {
        #[from]
        source: AppiumError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SuiteSummary {
    /// One record per executed check, in execution order
    pub records: Vec<ResultRecord>,
    pub screenshots: Vec<PathBuf>,
}

impl SuiteSummary {
    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }
}

pub struct SuiteRunner {
    results: ResultLog,
    screenshots: ScreenshotStore,
    element_timeout: Duration,
    poll_interval: Duration,
    replies: ReplyTimeouts,
}

impl SuiteRunner {
    pub fn new(results: ResultLog, screenshots: ScreenshotStore, config: &RunConfig) -> Self {
        Self {
            results,
            screenshots,
            element_timeout: config.element_timeout,
            poll_interval: config.poll_interval,
            replies: config.reply_timeouts,
        }
    }

    /// Run `checks` in order against `driver`, then end the session.
    /// Check failures never stop the run.
    pub async fn run<D: UiDriver>(&self, driver: &D, checks: &[Check]) -> SuiteSummary {
        let screen = ChatScreen::new(driver, self.element_timeout, self.poll_interval);
        let mut summary = SuiteSummary::default();
        for &check in checks {
            self.run_check(&screen, check, &mut summary).await;
        }

        if let Err(e) = driver.quit().await {
            log::warn!("Session {} teardown failed: {e}", driver.session_id());
        }
        summary
    }

    async fn run_check<D: UiDriver>(
        &self,
        screen: &ChatScreen<'_, D>,
        check: Check,
        summary: &mut SuiteSummary,
    ) {
        log::info!("Running {check}: {}", check.description());
        let record = match check.run(screen, &self.replies).await {
            Ok(outcome) => ResultRecord::new(check.name(), outcome.passed, outcome.notes),
            Err(e) => {
                log::warn!("{check} failed: {e}");
                if let Some(path) = self.capture_failure(screen.driver(), check).await {
                    summary.screenshots.push(path);
                }
                ResultRecord::new(check.name(), false, e.to_string())
            }
        };
        log::info!("{check}: {}", record.verdict());

        if let Err(e) = self.results.append(&record).await {
            log::error!(
                "Could not write results to {}: {e}",
                self.results.path().display()
            );
        }
        summary.records.push(record);
    }

    async fn capture_failure<D: UiDriver>(&self, driver: &D, check: Check) -> Option<PathBuf> {
        let capture = match driver.screen_capture().await {
            Ok(capture) => capture,
            Err(e) => {
                log::error!("Screenshot failed: {e}");
                return None;
            }
        };
        match self
            .screenshots
            .save(&check.screenshot_prefix(), &capture.bytes)
            .await
        {
            Ok(path) => {
                log::info!(
                    "Saved screenshot: {} ({}ms)",
                    path.display(),
                    capture.duration_ms
                );
                Some(path)
            }
            Err(e) => {
                log::error!("Screenshot failed: {e}");
                None
            }
        }
    }
}

/// Prepare artifacts, start the session and run the configured checks.
pub async fn run_suite(config: &RunConfig) -> Result<SuiteSummary, SuiteError> {
    let screenshots = ScreenshotStore::create(&config.screenshot_dir)
        .await
        .map_err(|source| SuiteError::ScreenshotDir {
            path: config.screenshot_dir.clone(),
            source,
        })?;
    let results = ResultLog::create(&config.results_path)
        .await
        .map_err(|source| SuiteError::ResultLog {
            path: config.results_path.clone(),
            source,
        })?;

    let session =
        AppiumSession::start(&config.server_url, &config.capabilities, config.http_timeout).await?;

    let runner = SuiteRunner::new(results, screenshots, config);
    Ok(runner.run(&session, &config.checks).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::locators;
    use crate::testing::FakeDriver;
    use std::path::Path;

    fn fast_config(dir: &Path) -> RunConfig {
        RunConfig {
            results_path: dir.join("kuber_results.csv"),
            screenshot_dir: dir.join("screenshots"),
            element_timeout: Duration::from_millis(30),
            poll_interval: Duration::from_millis(5),
            reply_timeouts: ReplyTimeouts {
                first_question: Duration::from_millis(30),
                follow_up: Duration::from_millis(20),
            },
            ..RunConfig::default()
        }
    }

    async fn runner_for(config: &RunConfig) -> SuiteRunner {
        let results = ResultLog::create(&config.results_path).await.unwrap();
        let screenshots = ScreenshotStore::create(&config.screenshot_dir).await.unwrap();
        SuiteRunner::new(results, screenshots, config)
    }

    fn log_lines(config: &RunConfig) -> Vec<String> {
        std::fs::read_to_string(&config.results_path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn screenshot_names(config: &RunConfig) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&config.screenshot_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn happy_screen() -> FakeDriver {
        FakeDriver::new()
            .with_element(&locators::kuber_entry(), "Kuber")
            .with_element(&locators::message_input(), "")
            .with_element(&locators::bot_reply_after("Hello"), "  Hi, I am Kuber  ")
            .with_element(&locators::bot_reply_after("Hi"), "Hello again")
            .with_element(&locators::bot_reply_after("Test question"), "Sure")
            .with_element(&locators::suggestion_chip(), "Tax saving")
            .with_element(&locators::suggestion_chip(), "Gold")
            .with_element(&locators::chat_history_button(), "Chat History")
    }

    #[tokio::test]
    async fn test_all_checks_pass_on_happy_screen() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let driver = happy_screen();

        let summary = runner_for(&config).await.run(&driver, &config.checks).await;

        assert_eq!(summary.records.len(), 5);
        assert_eq!(summary.failed(), 0);
        assert!(summary.screenshots.is_empty());
        assert!(screenshot_names(&config).is_empty());
        assert_eq!(driver.quit_calls(), 1);

        let lines = log_lines(&config);
        assert_eq!(lines[0], "test,passed,notes,timestamp");
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("basicQuestion,PASS,Hi; I am Kuber,"));
        assert!(lines[2].starts_with("suggestionChipClick,PASS,Clicked chip (if exists),"));
        assert!(lines[3].starts_with("emptyInput,PASS,Cleared input successfully,"));
        assert!(lines[4].starts_with("multipleQuestions,PASS,All questions sent,"));
        assert!(lines[5].starts_with("buttonsExist,PASS,Buttons checked (if exist),"));

        assert_eq!(driver.typed(), vec!["Hello", "Hi", "Test question"]);
        let chip_clicks = driver
            .clicked()
            .iter()
            .filter(|id| id.starts_with("xpath=//android.widget.Button"))
            .count();
        assert_eq!(chip_clicks, 1, "only the first chip is tapped");
    }

    #[tokio::test]
    async fn test_empty_screen_fails_only_what_throws() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let driver = FakeDriver::new();

        let summary = runner_for(&config).await.run(&driver, &config.checks).await;

        // Helpers swallow their own failures; only emptyInput lets the wait error escape.
        let verdicts: Vec<(&str, bool)> = summary
            .records
            .iter()
            .map(|r| (r.test.as_str(), r.passed))
            .collect();
        assert_eq!(
            verdicts,
            vec![
                ("basicQuestion", false),
                ("suggestionChipClick", true),
                ("emptyInput", false),
                ("multipleQuestions", true),
                ("buttonsExist", true),
            ]
        );
        assert_eq!(summary.records[0].notes, "No reply");
        assert!(summary.records[2].notes.contains("Timed out"));

        let shots = screenshot_names(&config);
        assert_eq!(shots.len(), 1);
        assert!(shots[0].starts_with("t03_exception_"));
        assert_eq!(summary.screenshots.len(), 1);
        assert_eq!(log_lines(&config).len(), 1 + 5);
        assert_eq!(driver.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_command_errors_are_recorded_with_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let driver = happy_screen()
            .failing(&locators::suggestion_chip(), "uiautomator2 crashed, with details")
            .failing(&locators::agents_button(), "socket hang up");

        let summary = runner_for(&config).await.run(&driver, &config.checks).await;

        assert_eq!(summary.failed(), 2);
        let lines = log_lines(&config);
        assert_eq!(lines.len(), 6);
        assert!(lines[2].starts_with("suggestionChipClick,FAIL,"));
        assert!(lines[2].contains("uiautomator2 crashed; with details"));
        assert!(lines[5].starts_with("buttonsExist,FAIL,"));
        assert_eq!(lines[2].split(',').count(), 4);

        let shots = screenshot_names(&config);
        assert_eq!(shots.len(), 2);
        assert!(shots[0].starts_with("t02_exception_"));
        assert!(shots[1].starts_with("t05_exception_"));
        assert_eq!(driver.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_screenshot_failure_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let driver = FakeDriver::new().without_screenshots();

        let summary = runner_for(&config).await.run(&driver, &config.checks).await;

        assert_eq!(summary.records.len(), 5);
        assert!(summary.screenshots.is_empty());
        assert!(screenshot_names(&config).is_empty());
        assert_eq!(driver.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_subset_of_checks() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(dir.path());
        let driver = happy_screen();

        let summary = runner_for(&config)
            .await
            .run(&driver, &[Check::ButtonsExist, Check::EmptyInput])
            .await;

        let names: Vec<&str> = summary.records.iter().map(|r| r.test.as_str()).collect();
        assert_eq!(names, vec!["buttonsExist", "emptyInput"]);
        assert_eq!(log_lines(&config).len(), 3);
        assert_eq!(driver.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_run_suite_without_server_leaves_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fast_config(dir.path());
        config.server_url = "http://127.0.0.1:9/".to_string();
        config.http_timeout = Duration::from_secs(2);

        let err = run_suite(&config).await.err().unwrap();
        assert!(matches!(err, SuiteError::Session { .. }));
        assert_eq!(log_lines(&config), vec!["test,passed,notes,timestamp"]);
        assert!(config.screenshot_dir.is_dir());
    }

    #[tokio::test]
    async fn test_run_suite_against_mock_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mut config = fast_config(dir.path());
        config.server_url = server.url();
        config.checks = vec![Check::ButtonsExist];

        let _start = server
            .mock("POST", "/session")
            .with_body(r#"{"value": {"sessionId": "s1", "capabilities": {}}}"#)
            .create_async()
            .await;
        // Kuber entry never appears
        let _lookup = server
            .mock("POST", "/session/s1/element")
            .with_status(404)
            .with_body(r#"{"value": {"error": "no such element", "message": "not here"}}"#)
            .create_async()
            .await;
        let _lookups = server
            .mock("POST", "/session/s1/elements")
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;
        let quit = server
            .mock("DELETE", "/session/s1")
            .with_body(r#"{"value": null}"#)
            .expect(1)
            .create_async()
            .await;

        let summary = run_suite(&config).await.unwrap();

        quit.assert_async().await;
        assert_eq!(summary.records.len(), 1);
        assert!(summary.records[0].passed);
        assert_eq!(log_lines(&config).len(), 2);
    }
}
