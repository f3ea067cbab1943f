use std::sync::Arc;

use crate::auth::{AuthError, JwtKeys, OAuthClients};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub jwt: Arc<JwtKeys>,
    pub oauth: Arc<OAuthClients>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Result<Self, AuthError> {
        Ok(Self {
            store,
            jwt: Arc::new(JwtKeys::from_config(&config.security)?),
            oauth: Arc::new(OAuthClients::from_config(&config.oauth)?),
            config: Arc::new(config),
        })
    }
}
