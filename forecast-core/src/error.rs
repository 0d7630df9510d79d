use std::fmt;

use thiserror::Error;

/// Which of the two upstream endpoints a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentConditions,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::CurrentConditions => "current conditions",
            Endpoint::Forecast => "forecast",
        }
    }

    /// Path segment appended to the provider base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CurrentConditions => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an upstream request did not produce a usable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The request never completed (DNS, connect, TLS, timeout, body read).
    Transport(String),
    /// The provider answered with a non-success status.
    Status { status: u16, body: String },
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamFailure::Transport(msg) => write!(f, "transport error: {msg}"),
            UpstreamFailure::Status { status, body } if body.is_empty() => {
                write!(f, "status {status}")
            }
            UpstreamFailure::Status { status, body } => write!(f, "status {status}: {body}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("City name must not be empty")]
    InvalidQuery,

    #[error("Upstream {endpoint} request failed ({reason})")]
    UpstreamUnavailable {
        endpoint: Endpoint,
        reason: UpstreamFailure,
    },

    #[error("Malformed upstream {endpoint} response: {reason}")]
    MalformedUpstreamResponse { endpoint: Endpoint, reason: String },
}

impl ForecastError {
    pub(crate) fn transport(endpoint: Endpoint, err: impl fmt::Display) -> Self {
        ForecastError::UpstreamUnavailable {
            endpoint,
            reason: UpstreamFailure::Transport(err.to_string()),
        }
    }

    pub(crate) fn status(endpoint: Endpoint, status: u16, body: &str) -> Self {
        ForecastError::UpstreamUnavailable {
            endpoint,
            reason: UpstreamFailure::Status {
                status,
                body: truncate_body(body),
            },
        }
    }

    pub(crate) fn malformed(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        ForecastError::MalformedUpstreamResponse {
            endpoint,
            reason: reason.into(),
        }
    }

    /// The endpoint responsible for the failure, if the failure came from upstream.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ForecastError::InvalidQuery => None,
            ForecastError::UpstreamUnavailable { endpoint, .. }
            | ForecastError::MalformedUpstreamResponse { endpoint, .. } => Some(*endpoint),
        }
    }

    /// HTTP status returned by the provider, when that is what failed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ForecastError::UpstreamUnavailable {
                reason: UpstreamFailure::Status { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_endpoint_and_status() {
        let err = ForecastError::status(Endpoint::CurrentConditions, 404, "city not found");

        assert_eq!(err.endpoint(), Some(Endpoint::CurrentConditions));
        assert_eq!(err.upstream_status(), Some(404));
        assert!(err.to_string().contains("current conditions"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let err = ForecastError::status(Endpoint::Forecast, 500, &body);

        match err {
            ForecastError::UpstreamUnavailable {
                reason: UpstreamFailure::Status { body, .. },
                ..
            } => assert_eq!(body.len(), 203),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_query_has_no_endpoint() {
        assert_eq!(ForecastError::InvalidQuery.endpoint(), None);
        assert_eq!(ForecastError::InvalidQuery.upstream_status(), None);
    }
}
