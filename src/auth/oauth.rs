use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use super::AuthError;
use crate::config::{OAuthConfig, OAuthCredentials};

const USER_AGENT: &str = concat!("nexguild-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Google, OAuthProvider::Github];

    /// Path segment and error-code prefix ("google")
    pub fn slug(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Github => "GitHub",
        }
    }

    fn authorize_endpoint(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::Github => "https://github.com/login/oauth/authorize",
        }
    }

    fn token_endpoint(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://oauth2.googleapis.com/token",
            OAuthProvider::Github => "https://github.com/login/oauth/access_token",
        }
    }

    fn scope(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "profile email",
            OAuthProvider::Github => "user:email",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Provider identity normalized across Google and GitHub
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthProfile {
    pub provider_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// GitHub login
    pub username: Option<String>,
    pub avatar: Option<String>,
    /// Public profile page (GitHub only)
    pub profile_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl From<GoogleUser> for OAuthProfile {
    fn from(user: GoogleUser) -> Self {
        Self {
            provider_id: user.sub,
            email: non_empty(user.email),
            display_name: non_empty(user.name),
            username: None,
            avatar: non_empty(user.picture),
            profile_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    html_url: Option<String>,
}

impl From<GithubUser> for OAuthProfile {
    fn from(user: GithubUser) -> Self {
        Self {
            provider_id: user.id.to_string(),
            email: non_empty(user.email),
            display_name: non_empty(user.name),
            username: Some(user.login),
            avatar: non_empty(user.avatar_url),
            profile_url: non_empty(user.html_url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Prefer the primary verified address, then any verified one
fn pick_github_email(emails: Vec<GithubEmail>) -> Option<String> {
    let mut verified: Vec<GithubEmail> = emails.into_iter().filter(|e| e.verified).collect();
    verified.sort_by_key(|e| !e.primary);
    verified.into_iter().next().map(|e| e.email)
}

/// Authorization-code clients for the configured providers
pub struct OAuthClients {
    http: reqwest::Client,
    google: Option<OAuthCredentials>,
    github: Option<OAuthCredentials>,
    callback_base_url: String,
}

impl OAuthClients {
    pub fn from_config(config: &OAuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        for provider in OAuthProvider::ALL {
            let configured = match provider {
                OAuthProvider::Google => config.google.is_some(),
                OAuthProvider::Github => config.github.is_some(),
            };
            if !configured {
                warn!("{} OAuth credentials missing. {} login will not work.", provider, provider);
            }
        }
        Ok(Self {
            http,
            google: config.google.clone(),
            github: config.github.clone(),
            callback_base_url: config.callback_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_enabled(&self, provider: OAuthProvider) -> bool {
        self.credentials(provider).is_ok()
    }

    fn credentials(&self, provider: OAuthProvider) -> Result<&OAuthCredentials, AuthError> {
        let creds = match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::Github => self.github.as_ref(),
        };
        creds.ok_or(AuthError::ProviderDisabled(provider.title()))
    }

    pub fn redirect_uri(&self, provider: OAuthProvider) -> String {
        format!("{}/api/auth/{}/callback", self.callback_base_url, provider.slug())
    }

    pub fn authorize_url(&self, provider: OAuthProvider, state: &str) -> Result<Url, AuthError> {
        let creds = self.credentials(provider)?;
        let mut url = Url::parse(provider.authorize_endpoint())
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &creds.client_id)
            .append_pair("redirect_uri", &self.redirect_uri(provider))
            .append_pair("response_type", "code")
            .append_pair("scope", provider.scope())
            .append_pair("state", state);
        Ok(url)
    }

    /// Trade an authorization code for the provider's view of the user
    pub async fn exchange(&self, provider: OAuthProvider, code: &str) -> Result<OAuthProfile, AuthError> {
        let access_token = self.access_token(provider, code).await?;
        debug!("Obtained {} access token", provider);
        match provider {
            OAuthProvider::Google => self.google_profile(&access_token).await,
            OAuthProvider::Github => self.github_profile(&access_token).await,
        }
    }

    async fn access_token(&self, provider: OAuthProvider, code: &str) -> Result<String, AuthError> {
        let creds = self.credentials(provider)?;
        let redirect_uri = self.redirect_uri(provider);
        let form = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response: TokenResponse = self
            .http
            .post(provider.token_endpoint())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match response {
            TokenResponse { access_token: Some(token), .. } => Ok(token),
            TokenResponse { error, error_description, .. } => Err(AuthError::Provider(
                error_description
                    .or(error)
                    .unwrap_or_else(|| "token exchange failed".to_string()),
            )),
        }
    }

    async fn google_profile(&self, token: &str) -> Result<OAuthProfile, AuthError> {
        let user: GoogleUser = self
            .http
            .get("https://www.googleapis.com/oauth2/v3/userinfo")
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(user.into())
    }

    async fn github_profile(&self, token: &str) -> Result<OAuthProfile, AuthError> {
        let user: GithubUser = self
            .http
            .get("https://api.github.com/user")
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let mut profile = OAuthProfile::from(user);

        // Private addresses only show up on the emails endpoint
        if profile.email.is_none() {
            let emails: Vec<GithubEmail> = self
                .http
                .get("https://api.github.com/user/emails")
                .bearer_auth(token)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            profile.email = pick_github_email(emails);
        }
        Ok(profile)
    }
}
