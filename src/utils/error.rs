use thiserror::Error;

#[derive(Error, Debug)]
pub enum BingoError {
    #[error("Topic not found: {topic}")]
    TopicNotFound { topic: String },

    #[error("Not enough items for a bingo card: need at least 24, got {count}")]
    InsufficientItems { count: usize, items: Vec<String> },

    #[error("Upstream service error{}: {detail}", status_suffix(.status))]
    Upstream { status: Option<u16>, detail: String },

    #[error("Upstream returned an invalid payload: {detail}")]
    InvalidResponseShape { detail: String },

    #[error("No stored items for custom topic: {topic}")]
    StorageMiss { topic: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者可以自行修正的錯誤（換主題、重新產生）
    User,
    /// 上游文字產生服務的錯誤
    Upstream,
    /// 設定或系統錯誤
    System,
}

impl BingoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BingoError::TopicNotFound { .. }
            | BingoError::InsufficientItems { .. }
            | BingoError::StorageMiss { .. }
            | BingoError::InvalidRequest { .. } => ErrorCategory::User,
            BingoError::Upstream { .. } | BingoError::InvalidResponseShape { .. } => {
                ErrorCategory::Upstream
            }
            BingoError::IoError(_)
            | BingoError::SerializationError(_)
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. } => ErrorCategory::System,
        }
    }

    /// HTTP status used when the error crosses the server boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            BingoError::InvalidRequest { .. } => 400,
            BingoError::TopicNotFound { .. } | BingoError::StorageMiss { .. } => 404,
            BingoError::InsufficientItems { .. } => 422,
            // 沿用上游的錯誤狀態碼，其餘一律 500
            BingoError::Upstream {
                status: Some(status),
                ..
            } if (400..=599).contains(status) => *status,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BingoError::TopicNotFound { topic } => {
                format!("The topic \"{}\" is not available.", topic)
            }
            BingoError::InsufficientItems { count, .. } => format!(
                "Generated too few items ({}). A bingo card needs at least 24.",
                count
            ),
            BingoError::Upstream { .. } | BingoError::InvalidResponseShape { .. } => {
                "The item generator is not responding correctly right now.".to_string()
            }
            BingoError::StorageMiss { topic } => format!(
                "Items for \"{}\" were not found in this session.",
                topic
            ),
            BingoError::InvalidRequest { message } => message.clone(),
            _ => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BingoError::TopicNotFound { .. } => "Pick a topic from the list and try again.",
            BingoError::InsufficientItems { .. } => {
                "Try a different or more specific topic, or generate again."
            }
            BingoError::Upstream { .. } | BingoError::InvalidResponseShape { .. } => {
                "Wait a moment and try again."
            }
            BingoError::StorageMiss { .. } => "Generate the items for this topic again.",
            BingoError::InvalidRequest { .. } => "Check the request fields and try again.",
            BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags."
            }
            BingoError::IoError(_) | BingoError::SerializationError(_) => {
                "Check the catalog file and server logs."
            }
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" (status {})", s))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, BingoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = BingoError::TopicNotFound {
            topic: "Pirates".to_string(),
        };
        assert_eq!(not_found.status_code(), 404);

        let too_few = BingoError::InsufficientItems {
            count: 10,
            items: vec![],
        };
        assert_eq!(too_few.status_code(), 422);

        let unavailable = BingoError::Upstream {
            status: Some(503),
            detail: "overloaded".to_string(),
        };
        assert_eq!(unavailable.status_code(), 503);

        let timeout = BingoError::Upstream {
            status: None,
            detail: "timed out".to_string(),
        };
        assert_eq!(timeout.status_code(), 500);

        // 上游回 200 但內容錯誤時不能把 200 傳給用戶端
        let odd = BingoError::Upstream {
            status: Some(200),
            detail: "missing candidates".to_string(),
        };
        assert_eq!(odd.status_code(), 500);

        let shape = BingoError::InvalidResponseShape {
            detail: "object".to_string(),
        };
        assert_eq!(shape.status_code(), 500);
    }

    #[test]
    fn test_insufficient_items_message_carries_count() {
        let err = BingoError::InsufficientItems {
            count: 23,
            items: vec![],
        };
        assert!(err.to_string().contains("got 23"));
        assert!(err.user_friendly_message().contains("(23)"));
        assert_eq!(err.category(), ErrorCategory::User);
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = BingoError::Upstream {
            status: Some(503),
            detail: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream service error (status 503): busy");

        let err = BingoError::Upstream {
            status: None,
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream service error: connection refused");
    }

    #[test]
    fn test_shape_error_is_upstream_category() {
        let err = BingoError::InvalidResponseShape {
            detail: "not an array".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(
            err.user_friendly_message(),
            BingoError::Upstream {
                status: None,
                detail: String::new()
            }
            .user_friendly_message()
        );
    }
}
