//! Errors raised while probing the load balancer.
//!
//! None of these reach the orchestrator: the hook collapses every variant into
//! `FAILED`. They exist so the log line says what actually went wrong.

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Load balancer endpoint not configured (set ALB_DNS_NAME)")]
    MissingEndpoint,

    #[error("Invalid probe URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Probe request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ProbeError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::MissingEndpoint => "missing_endpoint",
            ProbeError::InvalidUrl { .. } => "invalid_url",
            ProbeError::Client(_) => "client",
            ProbeError::Request(e) if e.is_timeout() => "timeout",
            ProbeError::Request(e) if e.is_connect() => "connect",
            ProbeError::Request(_) => "request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_display_names_variable() {
        let err = ProbeError::MissingEndpoint;
        assert!(err.to_string().contains("ALB_DNS_NAME"));
        assert_eq!(err.kind(), "missing_endpoint");
    }

    #[test]
    fn test_invalid_url_display() {
        let err = ProbeError::InvalidUrl {
            url: "https://bad host/".to_string(),
            message: "invalid domain character".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid probe URL 'https://bad host/': invalid domain character"
        );
        assert_eq!(err.kind(), "invalid_url");
    }
}
