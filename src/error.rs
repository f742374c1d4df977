use thiserror::Error;

/// All possible errors in the todo tool
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Record is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("Record field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Level {0} is out of range, expected 1-5")]
    InvalidLevel(u8),

    #[error("List '{name}' not found. Available lists: {available}", available = format_names(available))]
    ListNotFound { name: String, available: Vec<String> },

    #[error("Item '{name}' not found in list '{list}'")]
    ItemNotFound { list: String, name: String },

    #[error("`{0}` is not supported yet")]
    NotSupported(&'static str),

    #[error("Could not determine the home directory. Use --file or TD_FILE.")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TodoError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TodoError::MissingField { .. } => "MissingField",
            TodoError::InvalidField { .. } => "InvalidField",
            TodoError::InvalidLevel(_) => "InvalidLevel",
            TodoError::ListNotFound { .. } => "ListNotFound",
            TodoError::ItemNotFound { .. } => "ItemNotFound",
            TodoError::NotSupported(_) => "NotSupported",
            TodoError::NoHomeDirectory => "NoHomeDirectory",
            TodoError::Io(_) => "Io",
            TodoError::Json(_) => "Json",
        }
    }

    /// Lookup failures a command may report instead of aborting on
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TodoError::ListNotFound { .. } | TodoError::ItemNotFound { .. }
        )
    }
}

/// How a command treats the domain errors its operation returns.
///
/// `Fatal` propagates everything, so the process prints the message and exits
/// with status 1. `Reported` prints not-found errors and lets the invocation
/// finish successfully; any other error still propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Fatal,
    Reported,
}

impl ErrorPolicy {
    /// Apply the policy. `Ok(None)` means the error was reported and swallowed.
    pub fn apply<T>(self, result: Result<T>) -> Result<Option<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(Some(value)),
            (ErrorPolicy::Reported, Err(e)) if e.is_not_found() => {
                tracing::debug!(code = e.error_code(), "reporting non-fatal error");
                println!("{e}");
                Ok(None)
            }
            (_, Err(e)) => Err(e),
        }
    }
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TodoError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn list_not_found() -> TodoError {
        TodoError::ListNotFound {
            name: "home".to_string(),
            available: vec!["work".to_string(), "errands".to_string()],
        }
    }

    #[test]
    fn test_list_not_found_message_names_available_lists() {
        assert_eq!(
            list_not_found().to_string(),
            "List 'home' not found. Available lists: work, errands"
        );

        let err = TodoError::ListNotFound {
            name: "home".to_string(),
            available: vec![],
        };
        assert!(err.to_string().ends_with("Available lists: (none)"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(list_not_found().error_code(), "ListNotFound");
        assert_eq!(
            TodoError::MissingField { field: "date" }.error_code(),
            "MissingField"
        );
        assert_eq!(TodoError::NotSupported("tick").error_code(), "NotSupported");
    }

    #[test]
    fn test_fatal_policy_propagates() {
        let result: Result<()> = Err(list_not_found());
        let err = ErrorPolicy::Fatal.apply(result).unwrap_err();
        assert_eq!(err.error_code(), "ListNotFound");
    }

    #[test]
    fn test_reported_policy_swallows_not_found() {
        let result: Result<()> = Err(TodoError::ItemNotFound {
            list: "work".to_string(),
            name: "Buy milk".to_string(),
        });
        assert!(ErrorPolicy::Reported.apply(result).unwrap().is_none());

        let ok: Result<u8> = Ok(3);
        assert_eq!(ErrorPolicy::Reported.apply(ok).unwrap(), Some(3));
    }

    #[test]
    fn test_reported_policy_still_propagates_other_errors() {
        let result: Result<()> = Err(TodoError::NotSupported("update"));
        assert!(ErrorPolicy::Reported.apply(result).is_err());
    }
}
