use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::domain::entities::record::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    #[default]
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ColorMode::Light),
            "dark" => Some(ColorMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn signed_in(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Shared session read by the HTTP layer on every request.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    pub fn snapshot(&self) -> Session {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token.filter(|t| !t.is_empty())
    }

    pub fn replace(&self, session: Session) {
        match self.0.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    pub fn clear(&self) {
        self.replace(Session::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::RowId;

    #[test]
    fn handle_shares_state_between_clones() {
        let handle = SessionHandle::default();
        let other = handle.clone();

        other.replace(Session::signed_in(
            "tok".into(),
            User {
                id: RowId::from(1),
                email: "a@b.c".into(),
                name: "Ana".into(),
            },
        ));
        assert_eq!(handle.token().as_deref(), Some("tok"));

        handle.clear();
        assert!(!other.snapshot().is_authenticated());
        assert_eq!(other.token(), None);
    }

    #[test]
    fn color_mode_defaults_to_dark() {
        assert_eq!(ColorMode::default(), ColorMode::Dark);
        assert_eq!(ColorMode::Dark.toggled(), ColorMode::Light);
        assert_eq!(ColorMode::parse("light"), Some(ColorMode::Light));
        assert_eq!(ColorMode::parse("sepia"), None);
    }
}
