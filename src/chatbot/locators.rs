//! Locators for the Kuber chat screen of the Simplify Money app.

use crate::appium::Locator;

pub const INPUT_ID: &str = "com.simplifymoney:id/input_message";

pub fn message_input() -> Locator {
    Locator::Id(INPUT_ID.to_string())
}

/// Any button, or a text view mentioning "Tax" (the suggestion chips).
pub fn suggestion_chip() -> Locator {
    Locator::XPath(
        "//android.widget.Button | //android.widget.TextView[contains(@text,'Tax')]".to_string(),
    )
}

pub fn chat_history_button() -> Locator {
    Locator::UiAutomator(r#"new UiSelector().textContains("Chat History")"#.to_string())
}

pub fn agents_button() -> Locator {
    Locator::UiAutomator(r#"new UiSelector().descriptionContains("Agents")"#.to_string())
}

pub fn kuber_entry() -> Locator {
    Locator::UiAutomator(r#"new UiSelector().textContains("Kuber")"#.to_string())
}

/// First non-blank text view whose text is not the message the user just sent.
pub fn bot_reply_after(user_text: &str) -> Locator {
    Locator::XPath(format!(
        "//android.widget.TextView[string-length(normalize-space(@text))>0 and not(normalize-space(@text)={})]",
        xpath_literal(user_text)
    ))
}

/// Quote `s` as an XPath 1.0 string literal. XPath has no escape sequences,
/// so text holding both quote kinds is spliced together with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
