use thiserror::Error;

/// Errors raised while fetching the upstream status page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} returned HTTP status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Errors raised while parsing a stub_status body
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("status body has {found} line(s), expected 4")]
    TruncatedBody { found: usize },

    #[error("line {line} is missing the ':' separator")]
    MissingSeparator { line: usize },

    #[error("line {line} has {found} field(s), expected {expected}")]
    FieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("{field} value {token:?} is not an integer")]
    InvalidInteger { field: &'static str, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_formatting() {
        let error = FetchError::BadStatus {
            url: "http://localhost:8080/api".to_string(),
            status: 502,
        };

        let msg = error.to_string();
        assert!(msg.contains("http://localhost:8080/api"));
        assert!(msg.contains("502"));
    }

    #[test]
    fn test_parse_error_formatting() {
        let error = ParseError::InvalidInteger {
            field: "accepts",
            token: "28x479".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("accepts"));
        assert!(msg.contains("28x479"));
    }
}
