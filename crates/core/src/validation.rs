//! Field validators for incoming payloads.
//!
//! Each validator returns `Err(message)` suitable for
//! [`FieldErrors::check`](crate::error::FieldErrors::check).

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

/// Maximum length of catalog and title names.
pub const NAME_MAX_LEN: usize = 250;

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 150;

/// Maximum email length.
pub const EMAIL_MAX_LEN: usize = 254;

/// Maximum length of first/last name.
pub const PERSON_NAME_MAX_LEN: usize = 150;

/// Lowest review score.
pub const SCORE_MIN: i32 = 1;

/// Highest review score.
pub const SCORE_MAX: i32 = 10;

/// Score assigned when a review is created without one.
pub const DEFAULT_SCORE: i32 = 5;

/// Reserved because `/users/me` shadows it.
const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

pub const BLANK: &str = "This field may not be blank.";
pub const REQUIRED: &str = "This field is required.";

fn max_len(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!(
            "Ensure this field has no more than {max} characters."
        ));
    }
    Ok(())
}

/// Non-blank, at most [`NAME_MAX_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(BLANK.into());
    }
    max_len(name, NAME_MAX_LEN)
}

/// Review and comment bodies must not be blank.
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err(BLANK.into());
    }
    Ok(())
}

/// Scores are integers in `[SCORE_MIN, SCORE_MAX]`.
pub fn validate_score(score: i32) -> Result<(), String> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(format!(
            "Score must be between {SCORE_MIN} and {SCORE_MAX}."
        ));
    }
    Ok(())
}

/// Letters, digits and `@ . + - _`, at most [`USERNAME_MAX_LEN`], not `me`.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(BLANK.into());
    }
    max_len(username, USERNAME_MAX_LEN)?;
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, \
             and @/./+/-/_ characters."
                .into(),
        );
    }
    if username == RESERVED_USERNAME {
        return Err(format!("Username \"{RESERVED_USERNAME}\" is reserved."));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err(BLANK.into());
    }
    max_len(email, EMAIL_MAX_LEN)?;
    if !email.validate_email() {
        return Err("Enter a valid email address.".into());
    }
    Ok(())
}

/// First and last names are optional but bounded.
pub fn validate_person_name(name: &str) -> Result<(), String> {
    max_len(name, PERSON_NAME_MAX_LEN)
}
