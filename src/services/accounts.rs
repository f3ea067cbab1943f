use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::resource::mutate;
use crate::auth::{password, JwtKeys, OAuthProfile, OAuthProvider};
use crate::database::models::user::normalize_email;
use crate::database::models::{ProfileInput, User, UserProfile};
use crate::database::{Filter, Store};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::policy::ensure_owner;
use crate::types::{Operation, RecordId};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by signup and login: who you are plus a bearer token
#[derive(Debug, Serialize)]
pub struct Session {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: String,
    pub token: String,
}

impl Session {
    fn issue(user: &User, jwt: &JwtKeys) -> Result<Self, ApiError> {
        Ok(Self {
            id: user.meta.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            role: user.role.clone(),
            token: jwt.issue(user.meta.id, &user.email)?,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn find_by_email(store: &Store, email: &str) -> Result<Option<User>, ApiError> {
    Ok(store
        .users
        .find_one(&Filter::equals("email", normalize_email(email)))
        .await?)
}

pub async fn signup(store: &Store, jwt: &JwtKeys, input: SignupInput) -> Result<Session, ApiError> {
    let (name, email, plain) = match (present(input.name), present(input.email), input.password) {
        (Some(name), Some(email), Some(plain)) if !plain.is_empty() => (name, email, plain),
        _ => return Err(ApiError::validation_error("Please provide name, email and password", None)),
    };
    if plain.chars().count() < password::MIN_PASSWORD_LENGTH {
        return Err(ApiError::field_error(
            "password",
            format!("Password must be at least {} characters", password::MIN_PASSWORD_LENGTH),
        ));
    }
    if find_by_email(store, &email).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let hash = password::hash(plain).await?;
    let user = store.users.insert(User::new(name, &email, hash)).await?;
    info!("Registered user {} <{}>", user.meta.id, user.email);
    Session::issue(&user, jwt)
}

pub async fn login(store: &Store, jwt: &JwtKeys, input: LoginInput) -> Result<Session, ApiError> {
    let (email, plain) = match (present(input.email), input.password.filter(|p| !p.is_empty())) {
        (Some(email), Some(plain)) => (email, plain),
        _ => return Err(ApiError::validation_error("Please provide email and password", None)),
    };

    let user = match find_by_email(store, &email).await? {
        Some(user) => user,
        None => {
            warn!("Login failed for unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };
    if !password::verify(plain, user.password_hash.clone()).await? {
        warn!("Login failed for user {}", user.meta.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }
    Session::issue(&user, jwt)
}

pub async fn profile(store: &Store, acting: &AuthUser) -> Result<UserProfile, ApiError> {
    let user = store.users.get_404(acting.id).await?;
    Ok(user.profile())
}

pub async fn update_profile(store: &Store, acting: &AuthUser, input: ProfileInput) -> Result<UserProfile, ApiError> {
    let user = mutate(&*store.users, acting.id, |user: &mut User| {
        ensure_owner(&*user, acting, Operation::Update)?;
        user.apply_profile(input.clone());
        Ok(true)
    })
    .await?;
    Ok(user.profile())
}

/// Find or create the local account for an OAuth login.
///
/// Google matches on email; GitHub on its user id, then email. A matched account gets
/// the provider id linked if it has none. New accounts get a random password nobody knows.
pub async fn provision_oauth(store: &Store, provider: OAuthProvider, profile: OAuthProfile) -> Result<User, ApiError> {
    let existing = match provider {
        OAuthProvider::Google => {
            let email = profile
                .email
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("Google account has no email address"))?;
            find_by_email(store, email).await?
        }
        OAuthProvider::Github => {
            let by_id = store
                .users
                .find_one(&Filter::equals("githubId", profile.provider_id.clone()))
                .await?;
            match (by_id, profile.email.as_deref()) {
                (Some(user), _) => Some(user),
                (None, Some(email)) => find_by_email(store, email).await?,
                (None, None) => None,
            }
        }
    };

    if let Some(user) = existing {
        let provider_id = profile.provider_id;
        return mutate(&*store.users, user.meta.id, |user: &mut User| {
            let slot = match provider {
                OAuthProvider::Google => &mut user.google_id,
                OAuthProvider::Github => &mut user.github_id,
            };
            if slot.is_some() {
                return Ok(false);
            }
            *slot = Some(provider_id.clone());
            Ok(true)
        })
        .await;
    }

    let username = profile.username.clone().unwrap_or_default();
    let email = match (provider, profile.email.clone()) {
        (_, Some(email)) => email,
        (OAuthProvider::Github, None) if !username.is_empty() => format!("{}@github.com", username),
        _ => return Err(ApiError::bad_request(format!("{} account has no email address", provider))),
    };
    let name = match (profile.display_name.clone(), provider) {
        (Some(name), _) => name,
        (None, OAuthProvider::Google) => email.split('@').next().unwrap_or_default().to_string(),
        (None, OAuthProvider::Github) => username,
    };

    let hash = password::hash(password::random_password()).await?;
    let mut user = User::new(name, &email, hash);
    user.avatar = profile.avatar.unwrap_or_default();
    match provider {
        OAuthProvider::Google => user.google_id = Some(profile.provider_id),
        OAuthProvider::Github => {
            user.github_id = Some(profile.provider_id);
            user.github = profile.profile_url;
        }
    }

    let user = store.users.insert(user).await?;
    info!("Provisioned user {} from {}", user.meta.id, provider);
    Ok(user)
}
