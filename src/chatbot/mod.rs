// Chatbot module
// The Kuber chat screen: its locators, the screen helpers and the checks
// that exercise it.

pub mod checks;
pub mod locators;
pub mod screen;


pub use checks::{Check, CheckOutcome, ReplyTimeouts};
pub use screen::ChatScreen;
