pub mod appium;
pub mod args;
pub mod chatbot;
pub mod config;
pub mod report;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RunConfig;
pub use runner::{SuiteError, SuiteSummary, run_suite};
