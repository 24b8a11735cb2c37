#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
}

/// Local key/value storage for what must survive a restart: the session
/// token, the signed-in user and the color mode.
pub trait SettingsRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn load_setting(&self, key: &str) -> Result<Option<String>, RepoError>;
    fn store_setting(&self, key: &str, value: &str) -> Result<(), RepoError>;
    fn remove_setting(&self, key: &str) -> Result<(), RepoError>;
}

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";
pub const COLOR_MODE_KEY: &str = "color_mode";
