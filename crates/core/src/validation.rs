//! Input validation helpers.
//!
//! Each validator returns `Err(message)` with a human-readable reason; the
//! HTTP layer maps these to 400 responses.

use std::sync::OnceLock;

use regex::Regex;

/// Review scores are integers in [1, 10] inclusive.
pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

/// Maximum length for usernames and email addresses.
const MAX_IDENT_LEN: usize = 150;

/// Maximum length for review and comment bodies.
const MAX_TEXT_LEN: usize = 10_000;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").unwrap())
}

/// Validate a review score.
pub fn validate_score(score: i16) -> Result<(), String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        ));
    }
    Ok(())
}

/// Validate a username. `me` is reserved for the `/users/me` endpoint.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username must not be empty".to_string());
    }
    if username.len() > MAX_IDENT_LEN {
        return Err(format!(
            "Username must be at most {MAX_IDENT_LEN} characters"
        ));
    }
    if username.eq_ignore_ascii_case("me") {
        return Err("Username 'me' is not allowed".to_string());
    }
    if !username_regex().is_match(username) {
        return Err(
            "Username may only contain letters, digits and @ . + - _".to_string(),
        );
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email must not be empty".to_string());
    }
    if email.len() > MAX_IDENT_LEN {
        return Err(format!("Email must be at most {MAX_IDENT_LEN} characters"));
    }
    if !email_regex().is_match(email) {
        return Err(format!("'{email}' is not a valid email address"));
    }
    Ok(())
}

/// Maximum length for category and genre slugs.
const MAX_SLUG_LEN: usize = 50;

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_-]+$").unwrap())
}

/// Validate a category or genre slug.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug must not be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("Slug must be at most {MAX_SLUG_LEN} characters"));
    }
    if !slug_regex().is_match(slug) {
        return Err(
            "Slug may only contain lowercase letters, digits, '-' and '_'".to_string(),
        );
    }
    Ok(())
}

/// Validate a review or comment body.
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Text must not be empty".to_string());
    }
    if text.len() > MAX_TEXT_LEN {
        return Err(format!("Text must be at most {MAX_TEXT_LEN} characters"));
    }
    Ok(())
}
