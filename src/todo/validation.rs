//! Input validation for new todos.

use thiserror::Error;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 140;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("title must not be empty")]
    Empty,

    #[error("title must be at most {MAX_TITLE_LEN} characters")]
    TooLong,
}

/// Trim `title` and check its length.
pub fn validate_title(title: &str) -> Result<String, TitleError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TitleError::TooLong);
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(validate_title("  Buy milk \n"), Ok("Buy milk".to_string()));
    }

    #[test]
    fn test_blank_title() {
        assert_eq!(validate_title(""), Err(TitleError::Empty));
        assert_eq!(validate_title("   "), Err(TitleError::Empty));
    }

    #[test]
    fn test_title_length_limit() {
        assert!(validate_title(&"a".repeat(MAX_TITLE_LEN)).is_ok());
        assert_eq!(validate_title(&"a".repeat(MAX_TITLE_LEN + 1)), Err(TitleError::TooLong));
        // Counted in characters, not bytes.
        assert!(validate_title(&"\u{e9}".repeat(MAX_TITLE_LEN)).is_ok());
    }
}
