//! CMS login through an OAuth identity provider.

use crate::error::{EdgeError, Result};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{ACCEPT, LOCATION, USER_AGENT};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

const EXCHANGE_USER_AGENT: &str = "press-kit-auth";

/// Client credentials for the identity provider, read from the environment.
#[derive(Debug, Clone, Default)]
pub struct OAuthCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl OAuthCredentials {
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            client_id: present(client_id),
            client_secret: present(client_secret),
        }
    }

    /// Reads `<PROVIDER>_CLIENT_ID` and `<PROVIDER>_CLIENT_SECRET`,
    /// e.g. `GITHUB_CLIENT_ID` for the `github` provider.
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();
        let credentials = Self::new(
            std::env::var(format!("{}_CLIENT_ID", prefix)).ok(),
            std::env::var(format!("{}_CLIENT_SECRET", prefix)).ok(),
        );
        if credentials.client_id.is_none() || credentials.client_secret.is_none() {
            tracing::warn!(
                provider,
                "{}_CLIENT_ID or {}_CLIENT_SECRET not set; CMS login will fail",
                prefix,
                prefix
            );
        }
        credentials
    }
}

/// Human-readable provider name for error messages.
pub fn provider_label(provider: &str) -> String {
    match provider {
        "github" => "GitHub".to_string(),
        "gitlab" => "GitLab".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// `GET /auth`: redirect to the provider with a fresh anti-CSRF state token.
pub async fn auth(State(state): State<AppState>) -> Result<Response> {
    let oauth = &state.config.oauth;
    let label = provider_label(&oauth.provider);

    let client_id = state
        .credentials
        .client_id
        .as_deref()
        .ok_or_else(|| EdgeError::ConfigurationMissing(format!("{} Client ID", label)))?;

    let csrf_state = uuid::Uuid::new_v4().to_string();
    let url = reqwest::Url::parse_with_params(
        &oauth.authorize_url,
        &[
            ("client_id", client_id),
            ("redirect_uri", oauth.redirect_uri.as_str()),
            ("scope", oauth.scope.as_str()),
            ("state", csrf_state.as_str()),
        ],
    )
    .map_err(|e| {
        EdgeError::ConfigurationMissing(format!("A valid oauth.authorize_url ({})", e))
    })?;

    tracing::info!(provider = %oauth.provider, "redirecting to identity provider");
    Ok((StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response())
}

/// `GET /callback?code=...`: exchange the code and hand the token to the CMS window.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or(EdgeError::MissingCode)?;

    let oauth = &state.config.oauth;
    let label = provider_label(&oauth.provider);

    let (Some(client_id), Some(client_secret)) = (
        state.credentials.client_id.as_deref(),
        state.credentials.client_secret.as_deref(),
    ) else {
        return Err(EdgeError::ConfigurationMissing(format!(
            "{} Client ID or Secret",
            label
        )));
    };

    let result: TokenResponse = state
        .http
        .post(&oauth.token_url)
        .header(ACCEPT, "application/json")
        .header(USER_AGENT, EXCHANGE_USER_AGENT)
        .json(&serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
        }))
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = result.error {
        return Err(EdgeError::UpstreamAuth {
            provider: label,
            description: result.error_description.unwrap_or(error),
        });
    }

    let token = result.access_token.ok_or_else(|| EdgeError::UpstreamAuth {
        provider: label,
        description: "no access token in response".to_string(),
    })?;

    tracing::info!(provider = %oauth.provider, "CMS login completed");
    Ok(Html(callback_page(&oauth.provider, &token)).into_response())
}

/// Page that posts `authorization:<provider>:success:{"token":...}` to the
/// opening window and closes itself.
pub fn callback_page(provider: &str, token: &str) -> String {
    let message = format!(
        "authorization:{}:success:{}",
        provider,
        serde_json::json!({ "token": token })
    );
    // A JSON string is a valid JS string literal; `</` must not end the script.
    let literal = serde_json::to_string(&message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!doctype html>
<html>
<body>
<script>
    (function() {{
        var message = {};
        if (window.opener) {{
            window.opener.postMessage(message, '*');
        }}
        window.close();
    }})();
</script>
</body>
</html>"#,
        literal
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_label() {
        assert_eq!(provider_label("github"), "GitHub");
        assert_eq!(provider_label("bitbucket"), "Bitbucket");
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        let creds = OAuthCredentials::new(Some("  ".into()), Some("secret".into()));
        assert_eq!(creds.client_id, None);
        assert_eq!(creds.client_secret.as_deref(), Some("secret"));
    }

    #[test]
    fn test_callback_page_message() {
        let html = callback_page("github", "gho_abc");
        assert!(html.contains(
            r#"var message = "authorization:github:success:{\"token\":\"gho_abc\"}";"#
        ));
    }

    #[test]
    fn test_callback_page_cannot_break_out_of_script() {
        let html = callback_page("github", "</script><script>alert(1)</script>'");
        assert!(!html.contains("</script><script>"));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
