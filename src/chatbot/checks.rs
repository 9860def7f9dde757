// The five chat screen checks, in execution order
use super::locators;
use super::screen::ChatScreen;
use crate::appium::{AppiumResult, UiDriver};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    BasicQuestion,
    SuggestionChipClick,
    EmptyInput,
    MultipleQuestions,
    ButtonsExist,
}

/// Reply timeouts used by the question checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplyTimeouts {
    pub first_question: Duration,
    pub follow_up: Duration,
}

impl Default for ReplyTimeouts {
    fn default() -> Self {
        Self {
            first_question: Duration::from_secs(20),
            follow_up: Duration::from_secs(15),
        }
    }
}

/// What a check reports when its body completes without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub notes: String,
}

impl CheckOutcome {
    fn pass(notes: impl Into<String>) -> Self {
        Self {
            passed: true,
            notes: notes.into(),
        }
    }
}

pub const FOLLOW_UP_QUESTIONS: [&str; 2] = ["Hi", "Test question"];

impl Check {
    pub const ALL: [Check; 5] = [
        Check::BasicQuestion,
        Check::SuggestionChipClick,
        Check::EmptyInput,
        Check::MultipleQuestions,
        Check::ButtonsExist,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Check::BasicQuestion => "t01",
            Check::SuggestionChipClick => "t02",
            Check::EmptyInput => "t03",
            Check::MultipleQuestions => "t04",
            Check::ButtonsExist => "t05",
        }
    }

    /// Name written to the result log
    pub fn name(self) -> &'static str {
        match self {
            Check::BasicQuestion => "basicQuestion",
            Check::SuggestionChipClick => "suggestionChipClick",
            Check::EmptyInput => "emptyInput",
            Check::MultipleQuestions => "multipleQuestions",
            Check::ButtonsExist => "buttonsExist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Check::BasicQuestion => "send \"Hello\" and wait for a reply",
            Check::SuggestionChipClick => "tap the first suggestion chip, if any",
            Check::EmptyInput => "clear the message input",
            Check::MultipleQuestions => "send two questions back to back",
            Check::ButtonsExist => "look up the Chat History and Agents buttons",
        }
    }

    pub fn screenshot_prefix(self) -> String {
        format!("{}_exception", self.id())
    }

    /// Accepts the short id (`t03`) or the log name (`emptyInput`), case-insensitively.
    pub fn from_name(s: &str) -> Option<Check> {
        Check::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
    }

    /// Run the check body. An `Err` is the caller's cue to screenshot and record a failure.
    pub async fn run<D: UiDriver>(
        self,
        screen: &ChatScreen<'_, D>,
        replies: &ReplyTimeouts,
    ) -> AppiumResult<CheckOutcome> {
        screen.open_kuber_if_needed().await;
        let driver = screen.driver();
        match self {
            Check::BasicQuestion => {
                screen.send_text_question("Hello").await;
                Ok(match screen.wait_for_bot_reply_after(replies.first_question, "Hello").await {
                    Some(reply) => CheckOutcome::pass(screen.safe_get_text(&reply).await),
                    None => CheckOutcome {
                        passed: false,
                        notes: "No reply".to_string(),
                    },
                })
            }
            Check::SuggestionChipClick => {
                let chips = driver.find_elements(&locators::suggestion_chip()).await?;
                if let Some(first) = chips.first() {
                    driver.click(first).await?;
                }
                log::debug!("{} suggestion chip(s) on screen", chips.len());
                Ok(CheckOutcome::pass("Clicked chip (if exists)"))
            }
            Check::EmptyInput => {
                let input = screen.wait().until_visible(&locators::message_input()).await?;
                driver.clear(&input).await?;
                Ok(CheckOutcome::pass("Cleared input successfully"))
            }
            Check::MultipleQuestions => {
                for question in FOLLOW_UP_QUESTIONS {
                    screen.send_text_question(question).await;
                    screen.wait_for_bot_reply_after(replies.follow_up, question).await;
                }
                Ok(CheckOutcome::pass("All questions sent"))
            }
            Check::ButtonsExist => {
                let history = driver.find_elements(&locators::chat_history_button()).await?;
                let agents = driver.find_elements(&locators::agents_button()).await?;
                log::debug!(
                    "Chat History buttons: {}, Agents buttons: {}",
                    history.len(),
                    agents.len()
                );
                Ok(CheckOutcome::pass("Buttons checked (if exist)"))
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id(), self.name())
    }
}
