use crate::common::error::GitwsError;

/// Result type used across the crate
///
/// # Examples
///
/// ```
/// use gitws::common::result::GitwsResult;
/// use gitws::common::error::GitwsError;
///
/// fn example_with_error() -> GitwsResult<()> {
///     Err(GitwsError::filesystem_error("Something went wrong", None))
/// }
/// assert!(example_with_error().is_err());
/// ```
pub type GitwsResult<T> = Result<T, GitwsError>;

/// Conversions from foreign `Result`s into [`GitwsResult`]
pub trait ResultExt<T, E> {
    /// Wrap an I/O failure with a message and the path involved
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GitwsResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GitwsResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| GitwsError::filesystem_error_with_source(message, path, e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = PathBuf::from("/test/path");

        match result.with_filesystem_error("reading history", Some(path.clone())) {
            Err(GitwsError::FileSystemError { path: Some(p), message, .. }) => {
                assert_eq!(p, path);
                assert_eq!(message, "reading history");
            }
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }
}
