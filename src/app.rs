use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use dioxus::prelude::*;

use crate::domain::entities::resource::Resource;
use crate::domain::entities::session::{ColorMode, Session, SessionHandle};
use crate::infra::config::AppConfig;
use crate::infra::http::client::ApiClient;
use crate::infra::sqlite::repo::SqliteSettingsRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::toasts::Toasts;
use crate::ui::pages::dashboard::Dashboard;
use crate::ui::pages::login::{AuthMode, AuthPage};
use crate::ui::pages::resource_form::ResourceForm;
use crate::ui::pages::resource_list::ResourceList;
use crate::ui::state::app_state::{
    nav_button_style, shell_style, use_shared_cache, AppState, Services, SharedCache, View,
};
use crate::usecase::ports::repo::SettingsRepository;
use crate::usecase::services::dashboard_service::DashboardService;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::session_service::SessionService;
use crate::{default_config_path, default_db_path, DB_FILE_NAME};

#[derive(Clone)]
pub struct Bootstrapped {
    pub services: Services,
    pub session: Session,
    pub color_mode: ColorMode,
}

/// Loads config, opens the settings store and restores the stored session.
pub fn bootstrap(config_path: &Path) -> Result<Bootstrapped> {
    let config = AppConfig::load(config_path)?;
    let db_path = match &config.data_dir {
        Some(dir) => dir.join(DB_FILE_NAME),
        None => default_db_path()?,
    };

    let settings = Arc::new(SqliteSettingsRepo::new(db_path.clone()));
    settings
        .init()
        .with_context(|| format!("failed to open settings store: {}", db_path.display()))?;

    let handle = SessionHandle::default();
    let client = Arc::new(ApiClient::new(
        &config.api_base_url,
        config.request_timeout(),
        handle.clone(),
    ));
    let session_service = SessionService::new(settings, client.clone(), handle);
    let session = session_service
        .hydrate()
        .context("failed to restore session")?;
    let color_mode = session_service.color_mode().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default color mode");
        ColorMode::default()
    });

    tracing::info!(
        api = %config.api_base_url,
        signed_in = session.is_authenticated(),
        "bootstrapped"
    );

    Ok(Bootstrapped {
        services: Services {
            config: Arc::new(config),
            query: Arc::new(QueryService::new(client.clone())),
            edit: Arc::new(EditService::new(client.clone())),
            session: Arc::new(session_service),
            dashboard: Arc::new(DashboardService::new(client)),
        },
        session,
        color_mode,
    })
}

#[component]
pub fn App() -> Element {
    let booted = use_hook(|| {
        default_config_path()
            .and_then(|path| bootstrap(&path))
            .map_err(|err| format!("{err:#}"))
    });
    let booted = match booted {
        Ok(booted) => booted,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            return rsx! {
                div { style: "padding: 24px; font-family: system-ui, sans-serif;",
                    h2 { "Unable to start" }
                    p { "{err}" }
                }
            };
        }
    };

    let app = AppState::new(booted.session.clone(), booted.color_mode);
    let cache = use_shared_cache();
    use_context_provider(|| booted.services.clone());
    use_context_provider(|| app);
    use_context_provider(|| cache);

    rsx! { Shell {} }
}

fn view_key(view: &View) -> String {
    match view {
        View::Login => "login".to_string(),
        View::Register => "register".to_string(),
        View::Dashboard => "dashboard".to_string(),
        View::List(resource) => format!("list-{resource}"),
        View::Form { resource, id } => match id {
            Some(id) => format!("form-{resource}-{id}"),
            None => format!("form-{resource}-new"),
        },
    }
}

/// Signed-out users only ever see the auth pages.
pub fn effective_view(view: View, session: &Session) -> View {
    if view.requires_session() && !session.is_authenticated() {
        View::Login
    } else {
        view
    }
}

#[component]
fn Shell() -> Element {
    let services = use_context::<Services>();
    let mut app = use_context::<AppState>();
    let cache = use_context::<SharedCache>();

    let session = (app.session)();
    let mode = (app.color_mode)();
    let view = effective_view((app.view)(), &session);
    let key = view_key(&view);
    let signed_in = session.is_authenticated();
    let user_label = session
        .user
        .as_ref()
        .map(|user| {
            if user.name.is_empty() {
                user.email.clone()
            } else {
                user.name.clone()
            }
        })
        .unwrap_or_default();

    let services_for_mode = services.clone();
    let toggle_mode = move |_| {
        let next = mode.toggled();
        app.color_mode.set(next);
        let session_service = services_for_mode.session.clone();
        spawn(async move {
            match run_blocking(move || session_service.set_color_mode(next)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!(error = %err, "failed to store color mode"),
                Err(err) => tracing::warn!(error = %err, "color mode task failed"),
            }
        });
    };

    let services_for_logout = services.clone();
    let logout = move |_| {
        let session_service = services_for_logout.session.clone();
        cache.update(|list_cache| {
            for resource in Resource::ALL {
                list_cache.invalidate(resource);
            }
        });
        app.session.set(Session::default());
        app.navigate(View::Login);
        spawn(async move {
            match run_blocking(move || session_service.sign_out()).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!(error = %err, "failed to clear stored session"),
                Err(err) => tracing::warn!(error = %err, "sign out task failed"),
            }
        });
    };

    let content = match view.clone() {
        View::Login => rsx!(AuthPage { key: "{key}", mode: AuthMode::SignIn }),
        View::Register => rsx!(AuthPage { key: "{key}", mode: AuthMode::Register }),
        View::Dashboard => rsx!(Dashboard { key: "{key}" }),
        View::List(resource) => rsx!(ResourceList { key: "{key}", resource }),
        View::Form { resource, id } => rsx!(ResourceForm { key: "{key}", resource, id }),
    };
    let mode_label = match mode {
        ColorMode::Dark => "Light mode",
        ColorMode::Light => "Dark mode",
    };

    rsx! {
        div { style: "{shell_style(mode)}",
            if signed_in {
                nav { style: "display: flex; align-items: center; gap: 4px; padding: 8px 12px; border-bottom: 1px solid #374151; flex-wrap: wrap;",
                    strong { style: "margin-right: 12px;", "Finboard" }
                    button {
                        style: "{nav_button_style(view == View::Dashboard)}",
                        onclick: move |_| app.navigate(View::Dashboard),
                        "Dashboard"
                    }
                    {Resource::ALL.into_iter().map(|resource| {
                        let active = matches!(
                            &view,
                            View::List(current) | View::Form { resource: current, .. } if *current == resource
                        );
                        rsx!(
                            button {
                                key: "{resource}",
                                style: "{nav_button_style(active)}",
                                onclick: move |_| app.navigate(View::List(resource)),
                                "{resource.title()}"
                            }
                        )
                    })}
                    div { style: "flex: 1;" }
                    span { style: "margin-right: 8px; opacity: 0.8;", "{user_label}" }
                    button { style: "{nav_button_style(false)}", onclick: toggle_mode.clone(), "{mode_label}" }
                    button { style: "{nav_button_style(false)}", onclick: logout, "Sign out" }
                }
            } else {
                div { style: "display: flex; justify-content: flex-end; padding: 8px 12px;",
                    button { style: "{nav_button_style(false)}", onclick: toggle_mode, "{mode_label}" }
                }
            }
            main { style: "display: flex; flex-direction: column; flex: 1; min-height: 0; overflow: auto; padding: 16px;",
                {content}
            }
            Toasts { notifications: app.notifications }
        }
    }
}
