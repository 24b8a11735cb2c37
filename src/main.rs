use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

mod app;

mod domain {
    pub mod entities {
        pub mod debounce;
        pub mod deletion;
        pub mod draft;
        pub mod filter;
        pub mod notification;
        pub mod page;
        pub mod query_key;
        pub mod record;
        pub mod resource;
        pub mod session;
        pub mod sort;
    }
}

mod usecase {
    pub mod ports {
        pub mod data_source;
        pub mod repo;
    }
    pub mod services {
        pub mod dashboard_service;
        pub mod edit_service;
        pub mod list_cache;
        pub mod query_service;
        pub mod session_service;
    }
}

mod infra {
    pub mod config;
    pub mod http {
        pub mod client;
    }
    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
}

mod platform {
    pub mod desktop {
        pub mod blocking;
    }
}

mod ui {
    pub mod columns;
    pub mod grid;
    pub mod components {
        pub mod confirm_modal;
        pub mod data_grid;
        pub mod toasts;
    }
    pub mod pages {
        pub mod dashboard;
        pub mod login;
        pub mod resource_form;
        pub mod resource_list;
    }
    pub mod state {
        pub mod app_state;
    }
}


pub const DB_FILE_NAME: &str = "settings.sqlite";
pub const CONFIG_FILE_NAME: &str = "config.toml";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finboard=info")),
        )
        .init();

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "cannot prepare webview data directory");
            return;
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Finboard"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "finboard", "finboard")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join(DB_FILE_NAME))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
