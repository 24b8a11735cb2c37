use serde_json::Value;

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::page::ListPage;
use crate::domain::entities::record::{MonthlySummary, MonthlyTotals, RowId, User};
use crate::domain::entities::resource::Resource;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Could not reach the server";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("session expired")]
    Unauthorized { message: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            }
            | ApiError::Unauthorized {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            ApiError::Transport(_) => TRANSPORT_ERROR_MESSAGE.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Remote CRUD over the generic resources. Rows stay raw JSON so one grid
/// renders every resource; typed records are decoded at the column level.
pub trait ListDataSource: Send + Sync {
    fn fetch_page(&self, resource: Resource, state: &FilterState)
        -> Result<ListPage<Value>, ApiError>;
    fn fetch_one(&self, resource: Resource, id: &RowId) -> Result<Value, ApiError>;
    fn create(&self, resource: Resource, payload: &Value) -> Result<Value, ApiError>;
    fn update(&self, resource: Resource, id: &RowId, payload: &Value) -> Result<Value, ApiError>;
    fn delete(&self, resource: Resource, id: &RowId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
}

pub trait AuthGateway: Send + Sync {
    fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError>;
    fn register(&self, credentials: &Credentials) -> Result<User, ApiError>;
}

pub trait DashboardSource: Send + Sync {
    fn yearly_summary(&self, year: i32) -> Result<Vec<MonthlySummary>, ApiError>;
    fn monthly_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Category in use".into()),
        };
        assert_eq!(err.user_message(), "Category in use");

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.user_message(), TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn unauthorized_is_flagged() {
        assert!(ApiError::Unauthorized { message: None }.is_unauthorized());
        assert!(!ApiError::Decode("x".into()).is_unauthorized());
    }
}
