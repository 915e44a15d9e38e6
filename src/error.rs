use thiserror::Error;

/// Errors surfaced by the filter store, the resolvers and the request layer.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The backing store could not be reached for this request.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl BrowseError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BrowseError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP-shaped status for the error, used by callers that render responses.
    pub fn status_code(&self) -> u16 {
        match self {
            BrowseError::DataUnavailable(_) => 503,
            BrowseError::Validation { .. } => 400,
            BrowseError::NotFound(_) => 404,
            BrowseError::Unauthorized => 401,
            BrowseError::Database(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, BrowseError>;

#[cfg(test)]
mod tests {
    use super::BrowseError;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(BrowseError::DataUnavailable("down".into()).status_code(), 503);
        assert_eq!(BrowseError::validation("goals", "not a number").status_code(), 400);
        assert_eq!(BrowseError::NotFound("/nope".into()).status_code(), 404);
        assert_eq!(BrowseError::Unauthorized.status_code(), 401);
    }

    #[test]
    fn validation_message_names_field() {
        let err = BrowseError::validation("country", "must not be empty");
        assert_eq!(err.to_string(), "invalid country: must not be empty");
    }
}
