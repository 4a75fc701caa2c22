//! Error types for the B+-tree index.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors surfaced by the index.
///
/// A missing key is not an error: lookups return `Option` and deletions
/// report whether anything was removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested degree cannot hold a valid split.
    #[error("invalid configuration: degree {degree} is below the minimum of {minimum}")]
    InvalidConfiguration { degree: usize, minimum: usize },

    /// A structural invariant does not hold.
    ///
    /// Only reported by [`BPlusTree::validate`](crate::BPlusTree::validate).
    /// The mutation paths never produce it; they panic instead, since a
    /// broken invariant there means the tree is already corrupted.
    #[error("structural invariant violated: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfiguration {
            degree: 2,
            minimum: 3,
        };
        assert_eq!(
            format!("{}", err),
            "invalid configuration: degree 2 is below the minimum of 3"
        );

        let err = Error::InvariantViolation("leaf chain out of order".into());
        assert_eq!(
            format!("{}", err),
            "structural invariant violated: leaf chain out of order"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<Error>();
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
