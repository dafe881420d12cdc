//! Input validation for catalog mutations
//!
//! Pure checks with no I/O. Book input is checked in a fixed order (title,
//! author, genres) and the first violation wins.

use thiserror::Error;

/// Minimum number of characters in a book title or an author name
pub const MIN_NAME_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Book title too short")]
    TitleTooShort,
    #[error("Author name too short")]
    AuthorNameTooShort,
    #[error("Books require at least 1 genre")]
    NoGenres,
    #[error("Genres must not be blank")]
    BlankGenre,
    #[error("Password is required")]
    MissingPassword,
}

impl ValidationError {
    /// Input field the violation refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleTooShort => "title",
            Self::AuthorNameTooShort => "author",
            Self::NoGenres | Self::BlankGenre => "genres",
            Self::MissingPassword => "password",
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Check the input of `addBook`
pub fn validate_book_input(
    title: &str,
    author_name: &str,
    genres: &[String],
) -> Result<(), ValidationError> {
    if char_len(title) < MIN_NAME_LENGTH {
        return Err(ValidationError::TitleTooShort);
    }
    if char_len(author_name) < MIN_NAME_LENGTH {
        return Err(ValidationError::AuthorNameTooShort);
    }
    if genres.is_empty() {
        return Err(ValidationError::NoGenres);
    }
    if genres.iter().any(|g| g.trim().is_empty()) {
        return Err(ValidationError::BlankGenre);
    }
    Ok(())
}

/// Check the input of `editAuthor`.
///
/// Nothing beyond the author's existence is required, and that is checked
/// against the store by the caller.
pub fn validate_author_edit(_name: &str, _set_born_to: i32) -> Result<(), ValidationError> {
    Ok(())
}

/// Check the input of `createUser`, returning the password to hash
pub fn validate_user_input(password: Option<&str>) -> Result<&str, ValidationError> {
    match password {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ValidationError::MissingPassword),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn genres(values: &[&str]) -> Vec<String> {
        values.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_valid_book() {
        assert_eq!(
            validate_book_input("Dune", "F. Herbert", &genres(&["sci-fi"])),
            Ok(())
        );
    }

    #[test]
    fn test_boundary_lengths() {
        assert_eq!(validate_book_input("Emm", "Ann", &genres(&["x"])), Ok(()));
        assert_eq!(
            validate_book_input("It", "Stephen King", &genres(&["horror"])),
            Err(ValidationError::TitleTooShort)
        );
        assert_eq!(
            validate_book_input("Carrie", "SK", &genres(&["horror"])),
            Err(ValidationError::AuthorNameTooShort)
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // two characters, four bytes
        assert_eq!(
            validate_book_input("Ωμ", "Homer", &genres(&["epic"])),
            Err(ValidationError::TitleTooShort)
        );
        assert_eq!(validate_book_input("Ωμέ", "Homer", &genres(&["epic"])), Ok(()));
    }

    #[test]
    fn test_first_violation_wins() {
        assert_eq!(
            validate_book_input("", "", &[]),
            Err(ValidationError::TitleTooShort)
        );
        assert_eq!(
            validate_book_input("Valid", "", &[]),
            Err(ValidationError::AuthorNameTooShort)
        );
        assert_eq!(
            validate_book_input("Valid", "Valid", &[]),
            Err(ValidationError::NoGenres)
        );
    }

    #[test]
    fn test_blank_genre() {
        assert_matches!(
            validate_book_input("Dune", "Frank Herbert", &genres(&["sci-fi", "  "])),
            Err(ValidationError::BlankGenre)
        );
    }

    #[test]
    fn test_author_edit_has_no_extra_constraints() {
        assert_eq!(validate_author_edit("", -500), Ok(()));
    }

    #[test]
    fn test_user_password_required() {
        assert_eq!(validate_user_input(Some("secret")), Ok("secret"));
        assert_eq!(
            validate_user_input(Some("")),
            Err(ValidationError::MissingPassword)
        );
        assert_eq!(validate_user_input(None), Err(ValidationError::MissingPassword));
    }
}
