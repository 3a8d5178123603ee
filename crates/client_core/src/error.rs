use thiserror::Error;

/// Failure talking to the product store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not reach the product store: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("malformed response from the product store: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("product store response is missing `{0}`")]
    Malformed(&'static str),
    #[error("{}", .message.as_deref().unwrap_or("product store rejected the request"))]
    Rejected { message: Option<String> },
}

impl StoreError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: Some(message.into()),
        }
    }

    /// Text shown to the user. Rejections without a store message use `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            Self::Rejected { .. } => fallback.to_string(),
            Self::Transport(_) => "could not reach the product store".to_string(),
            Self::Decode(_) | Self::Malformed(_) => {
                "malformed response from the product store".to_string()
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Malformed("json body");
        }
        Self::Transport(value)
    }
}

/// A form field that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("name is required")]
    MissingName,
    #[error("price `{0}` is not a number")]
    InvalidPrice(String),
    #[error("stock `{0}` is not a whole number")]
    InvalidStock(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_store_message() {
        let err = StoreError::rejected("UNIQUE constraint failed");
        assert_eq!(
            err.user_message("Error creating product"),
            "UNIQUE constraint failed"
        );
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = StoreError::Rejected { message: None };
        assert_eq!(
            err.user_message("Error deleting product"),
            "Error deleting product"
        );
        let blank = StoreError::rejected("  ");
        assert_eq!(blank.user_message("fallback"), "fallback");
    }

    #[test]
    fn decode_failure_is_normalized() {
        let source = serde_json::from_str::<u8>("nope").expect_err("invalid json");
        let err = StoreError::from(source);
        assert_eq!(
            err.user_message("ignored"),
            "malformed response from the product store"
        );
        assert!(!err.is_transport());
    }
}
