//! Result alias and a small logging combinator.

use crate::error::Error;

/// The standard Result type for memhunt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for observing failures without consuming them.
pub trait ResultExt<T> {
    /// Run `f` on the error, if any, and hand the Result back unchanged.
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_error_sees_failure() {
        let result: Result<i32> = Err(Error::backend_failure("enumerate", "test"));
        let mut seen = None;
        let result = result.inspect_error(|e| seen = Some(e.kind()));
        assert!(result.is_err());
        assert_eq!(seen, Some(crate::ErrorKind::BackendFailure));
    }

    #[test]
    fn test_inspect_error_skips_ok() {
        let result: Result<i32> = Ok(1);
        let mut called = false;
        let result = result.inspect_error(|_| called = true);
        assert_eq!(result, Ok(1));
        assert!(!called);
    }
}
