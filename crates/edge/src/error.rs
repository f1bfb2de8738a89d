use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures at the HTTP edge. Every variant renders as a plain-text body.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// The feed could not be fetched or was not valid JSON.
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Required external settings (such as identity provider credentials) are absent.
    #[error("{0} not configured")]
    ConfigurationMissing(String),

    /// The identity provider answered the token exchange with an error payload.
    #[error("{provider} OAuth Error: {description}")]
    UpstreamAuth {
        provider: String,
        description: String,
    },

    #[error("Missing code param")]
    MissingCode,

    #[error("Function Error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EdgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::ContentUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EdgeError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            EdgeError::ConfigurationMissing(_) | EdgeError::Http(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            EdgeError::UpstreamAuth { .. } | EdgeError::MissingCode => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EdgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EdgeError::ConfigurationMissing("GitHub Client ID".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(EdgeError::MissingCode.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EdgeError::ItemNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_messages() {
        let err = EdgeError::UpstreamAuth {
            provider: "GitHub".into(),
            description: "The code passed is incorrect or expired.".into(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub OAuth Error: The code passed is incorrect or expired."
        );
        assert_eq!(
            EdgeError::ConfigurationMissing("GitHub Client ID or Secret".into()).to_string(),
            "GitHub Client ID or Secret not configured"
        );
    }
}
