//! GitHub OAuth sign-in flow.
//!
//! Authorize redirect -> callback with code -> token exchange -> user fetch.
//! The profile is provisioned on first sign-in; afterwards the email is the
//! stable link between the GitHub account and the profile row.

use serde::Deserialize;

use crate::config::GithubConfig;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

pub struct GithubOAuth {
    client: reqwest::Client,
    config: GithubConfig,
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

/// The slice of the GitHub user payload the provisioning step needs.
#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl GithubUser {
    /// GitHub hides the account email when the user opts out; fall back to
    /// the stable noreply alias so provisioning still has a unique key.
    pub fn email_or_noreply(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("{}@users.noreply.github.com", self.login))
    }
}

impl GithubOAuth {
    pub fn new(config: GithubConfig, public_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            redirect_url: format!("{}/auth/callback", public_base_url.trim_end_matches('/')),
        }
    }

    /// The browser redirect that starts the flow. `state` is the CSRF token
    /// echoed back on the callback.
    pub fn authorize_url(&self, state: &str) -> String {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("scope", "user:email"),
                ("state", state),
            ],
        )
        .expect("static authorize url");
        url.to_string()
    }

    /// Exchange the callback code for an access token, then fetch the user.
    pub async fn exchange_code(&self, code: &str) -> Result<GithubUser, reqwest::Error> {
        let token: AccessToken = self
            .client
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.client
            .get(USER_URL)
            // GitHub's API rejects requests without a User-Agent
            .header(reqwest::header::USER_AGENT, "quill-web")
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.access_token),
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
