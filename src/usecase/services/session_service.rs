use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::record::User;
use crate::domain::entities::session::{ColorMode, Session, SessionHandle};
use crate::usecase::ports::data_source::{ApiError, AuthGateway, Credentials};
use crate::usecase::ports::repo::{
    RepoError, SettingsRepository, COLOR_MODE_KEY, TOKEN_KEY, USER_KEY,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to persist session: {0}")]
    Storage(#[from] RepoError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Owns the signed-in state: the shared handle the HTTP layer reads and the
/// persisted copy restored at startup.
pub struct SessionService {
    settings: Arc<dyn SettingsRepository>,
    auth: Arc<dyn AuthGateway>,
    handle: SessionHandle,
}

impl SessionService {
    pub fn new(
        settings: Arc<dyn SettingsRepository>,
        auth: Arc<dyn AuthGateway>,
        handle: SessionHandle,
    ) -> Self {
        Self {
            settings,
            auth,
            handle,
        }
    }

    /// Restores the persisted session. A stored user that no longer parses
    /// is treated as signed out.
    pub fn hydrate(&self) -> Result<Session, RepoError> {
        let token = self.settings.load_setting(TOKEN_KEY)?;
        let user = match self.settings.load_setting(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable stored user");
                    None
                }
            },
            None => None,
        };

        let session = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => Session::signed_in(token, user),
            _ => Session::default(),
        };
        self.handle.replace(session.clone());
        Ok(session)
    }

    pub fn sign_in(&self, credentials: &Credentials) -> Result<Session, SessionError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let grant = self.auth.login(credentials)?;
        let user_json = serde_json::to_string(&grant.user)
            .map_err(|err| RepoError::Message(err.to_string()))?;
        self.settings.store_setting(TOKEN_KEY, &grant.token)?;
        self.settings.store_setting(USER_KEY, &user_json)?;

        info!(user = %grant.user.email, "signed in");
        let session = Session::signed_in(grant.token, grant.user);
        self.handle.replace(session.clone());
        Ok(session)
    }

    pub fn register(&self, credentials: &Credentials) -> Result<User, SessionError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        let user = self.auth.register(credentials)?;
        info!(user = %user.email, "registered");
        Ok(user)
    }

    /// Clears the in-memory session first so no later request carries the token.
    pub fn sign_out(&self) -> Result<(), RepoError> {
        self.handle.clear();
        self.settings.remove_setting(TOKEN_KEY)?;
        self.settings.remove_setting(USER_KEY)?;
        info!("signed out");
        Ok(())
    }

    /// Drops the in-memory session on a 401 without touching storage; the
    /// caller persists it with [`SessionService::sign_out`] off the UI thread.
    /// Returns whether the session was dropped.
    pub fn expire_on_unauthorized(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        self.handle.clear();
        warn!("session rejected by the server");
        true
    }

    pub fn color_mode(&self) -> Result<ColorMode, RepoError> {
        Ok(self
            .settings
            .load_setting(COLOR_MODE_KEY)?
            .and_then(|raw| ColorMode::parse(&raw))
            .unwrap_or_default())
    }

    pub fn set_color_mode(&self, mode: ColorMode) -> Result<(), RepoError> {
        self.settings.store_setting(COLOR_MODE_KEY, mode.as_str())
    }
}
