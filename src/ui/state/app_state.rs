use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use serde_json::Value;

use crate::domain::entities::notification::{Notification, NotificationCenter};
use crate::domain::entities::page::ListPage;
use crate::domain::entities::query_key::QueryKey;
use crate::domain::entities::record::RowId;
use crate::domain::entities::resource::Resource;
use crate::domain::entities::session::{ColorMode, Session};
use crate::infra::config::AppConfig;
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::data_source::ApiError;
use crate::usecase::services::dashboard_service::DashboardService;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::list_cache::{FetchTicket, ListCache};
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::session_service::SessionService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    List(Resource),
    Form {
        resource: Resource,
        id: Option<RowId>,
    },
}

impl View {
    pub fn requires_session(&self) -> bool {
        !matches!(self, View::Login | View::Register)
    }
}

#[derive(Clone)]
pub struct Services {
    pub config: Arc<AppConfig>,
    pub query: Arc<QueryService>,
    pub edit: Arc<EditService>,
    pub session: Arc<SessionService>,
    pub dashboard: Arc<DashboardService>,
}

/// App-wide signals. Copy, so handlers capture it freely.
#[derive(Clone, Copy)]
pub struct AppState {
    pub view: Signal<View>,
    pub session: Signal<Session>,
    pub color_mode: Signal<ColorMode>,
    pub notifications: Signal<NotificationCenter>,
}

impl AppState {
    pub fn new(session: Session, color_mode: ColorMode) -> Self {
        let start = if session.is_authenticated() {
            View::Dashboard
        } else {
            View::Login
        };
        Self {
            view: use_signal(move || start),
            session: use_signal(move || session),
            color_mode: use_signal(move || color_mode),
            notifications: use_signal(NotificationCenter::default),
        }
    }

    pub fn notify(mut self, notification: Notification) {
        if notification.is_error() {
            tracing::warn!(message = %notification.message, "error shown to user");
        }
        let id = self.notifications.write().push(notification);
        let mut notifications = self.notifications;
        spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            notifications.write().dismiss(id);
        });
    }

    pub fn navigate(mut self, view: View) {
        self.view.set(view);
    }

    /// Shows the error and, on a 401, drops the session and returns to login.
    pub fn report_api_error(mut self, services: &Services, err: &ApiError, message: String) {
        if services.session.expire_on_unauthorized(err) {
            self.session.set(Session::default());
            self.view.set(View::Login);
            self.notify(Notification::error("Session expired, please sign in again"));
            let session_service = services.session.clone();
            spawn(async move {
                match run_blocking(move || session_service.sign_out()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::warn!(error = %err, "failed to clear stored session"),
                    Err(err) => tracing::warn!(error = %err, "sign out task failed"),
                }
            });
            return;
        }
        self.notify(Notification::error(message));
    }
}

/// List pages shared by every view. The revision signal is what views
/// subscribe to; the cache itself lives outside the signal graph so effects
/// can start fetches without re-triggering themselves.
#[derive(Clone)]
pub struct SharedCache {
    inner: Rc<RefCell<ListCache>>,
    revision: Signal<u64>,
}

pub fn use_shared_cache() -> SharedCache {
    SharedCache {
        inner: use_hook(|| Rc::new(RefCell::new(ListCache::new()))),
        revision: use_signal(|| 0_u64),
    }
}

impl SharedCache {
    /// Subscribes the calling scope to cache changes.
    pub fn watch(&self) -> u64 {
        *self.revision.read()
    }

    pub fn get(&self, key: &QueryKey) -> Option<ListPage<Value>> {
        self.inner.borrow().get(key).cloned()
    }

    pub fn begin(&self, key: &QueryKey) -> Option<FetchTicket> {
        self.inner.borrow_mut().begin(key)
    }

    pub fn store(&self, ticket: FetchTicket, page: ListPage<Value>) -> bool {
        let stored = self.inner.borrow_mut().store(ticket, page);
        if stored {
            self.bump();
        }
        stored
    }

    pub fn fail(&self, ticket: &FetchTicket) {
        self.inner.borrow_mut().fail(ticket);
    }

    /// Runs a mutation against the cache and wakes every watching view.
    pub fn update<T>(&self, f: impl FnOnce(&mut ListCache) -> T) -> T {
        let result = f(&mut self.inner.borrow_mut());
        self.bump();
        result
    }

    fn bump(&self) {
        let mut revision = self.revision;
        *revision.write() += 1;
    }
}

pub fn shell_style(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => "display: flex; flex-direction: column; height: 100vh; background: #111827; color: #e5e7eb; font-family: system-ui, sans-serif;",
        ColorMode::Light => "display: flex; flex-direction: column; height: 100vh; background: #f9fafb; color: #111827; font-family: system-ui, sans-serif;",
    }
}

pub fn panel_style(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => "background: #1f2937; border: 1px solid #374151; border-radius: 8px; padding: 16px;",
        ColorMode::Light => "background: #fff; border: 1px solid #d0d5dd; border-radius: 8px; padding: 16px;",
    }
}

pub fn nav_button_style(active: bool) -> &'static str {
    if active {
        "padding: 6px 12px; border: none; border-radius: 6px; background: #2563eb; color: #fff; cursor: pointer;"
    } else {
        "padding: 6px 12px; border: none; border-radius: 6px; background: transparent; color: inherit; cursor: pointer;"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_views_skip_session() {
        assert!(!View::Login.requires_session());
        assert!(!View::Register.requires_session());
        assert!(View::Dashboard.requires_session());
        assert!(View::List(Resource::Entries).requires_session());
    }

    #[test]
    fn shell_follows_color_mode() {
        assert!(shell_style(ColorMode::Dark).contains("#111827"));
        assert!(shell_style(ColorMode::Light).contains("#f9fafb"));
        assert!(nav_button_style(true).contains("#2563eb"));
    }
}
