// Error types for the pulse application.
// Covers transport failures, backend envelope errors, and the mapping from
// terminal failures to the messages shown in the console.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("backend error {code}: {message}")]
    Envelope { code: i64, message: String },

    #[error("empty response payload")]
    MissingData,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}

pub type Result<T> = std::result::Result<T, PulseError>;

impl PulseError {
    /// Message shown to the user when a request fails terminally.
    pub fn user_message(&self) -> String {
        match self {
            PulseError::Status { status } => match status {
                400 => "Malformed request".to_string(),
                401 => "Authentication required".to_string(),
                403 => "Access denied".to_string(),
                404 => "Resource not found".to_string(),
                500..=599 => "Server internal error".to_string(),
                other => format!("Request failed (HTTP {})", other),
            },
            PulseError::Http(err) => {
                if err.is_builder() || err.is_request() {
                    // The request never left this process.
                    "Invalid request configuration".to_string()
                } else {
                    "Cannot reach the analytics server".to_string()
                }
            }
            PulseError::Envelope { message, .. } => {
                if message.is_empty() {
                    "The server reported an error".to_string()
                } else {
                    message.clone()
                }
            }
            PulseError::MissingData | PulseError::Json(_) => {
                "Malformed server response".to_string()
            }
            PulseError::BaseUrl(_) => "Invalid request configuration".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_mapping() {
        let cases = [
            (400, "Malformed request"),
            (401, "Authentication required"),
            (403, "Access denied"),
            (404, "Resource not found"),
            (500, "Server internal error"),
        ];
        for (status, expected) in cases {
            assert_eq!(PulseError::Status { status }.user_message(), expected);
        }
    }

    #[test]
    fn test_5xx_maps_to_server_internal_error() {
        // The whole server-error range shares one category, not just 500.
        for status in [500, 502, 503, 599] {
            assert_eq!(
                PulseError::Status { status }.user_message(),
                "Server internal error"
            );
        }
    }

    #[test]
    fn test_unmapped_status_includes_code() {
        let msg = PulseError::Status { status: 418 }.user_message();
        assert!(msg.contains("418"), "message should carry the code: {}", msg);
    }

    #[test]
    fn test_envelope_message_passthrough() {
        let err = PulseError::Envelope {
            code: 500,
            message: "query failed".to_string(),
        };
        assert_eq!(err.user_message(), "query failed");

        let blank = PulseError::Envelope {
            code: 500,
            message: String::new(),
        };
        assert_eq!(blank.user_message(), "The server reported an error");
    }

    #[test]
    fn test_malformed_body_message() {
        let err: PulseError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.user_message(), "Malformed server response");
    }
}
