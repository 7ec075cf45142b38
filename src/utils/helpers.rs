//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn magic_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{6})").expect("magic code pattern is valid"))
}

/// Check whether text contains a six digit sign-in code
pub fn is_magic_code(text: &str) -> bool {
    magic_code_pattern().is_match(text)
}

/// Extract the first six digit sign-in code from text
pub fn extract_magic_code(text: &str) -> Option<String> {
    magic_code_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Normalize user text for keyword matching
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
