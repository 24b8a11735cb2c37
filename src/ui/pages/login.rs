use dioxus::prelude::*;

use crate::domain::entities::notification::Notification;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::{panel_style, AppState, Services, View};
use crate::usecase::ports::data_source::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in",
            AuthMode::Register => "Create account",
        }
    }

    fn switch_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "No account yet? Register",
            AuthMode::Register => "Already registered? Sign in",
        }
    }

    fn other_view(self) -> View {
        match self {
            AuthMode::SignIn => View::Register,
            AuthMode::Register => View::Login,
        }
    }
}

#[component]
pub fn AuthPage(mode: AuthMode) -> Element {
    let services = use_context::<Services>();
    let mut app = use_context::<AppState>();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let submit = move |_| {
        if pending() {
            return;
        }
        let credentials = Credentials {
            email: email.peek().trim().to_string(),
            password: password.peek().clone(),
        };
        pending.set(true);
        error.set(None);
        let session = services.session.clone();
        spawn(async move {
            match mode {
                AuthMode::SignIn => {
                    let result = run_blocking(move || session.sign_in(&credentials)).await;
                    pending.set(false);
                    match result {
                        Ok(Ok(signed_in)) => {
                            app.session.set(signed_in);
                            app.navigate(View::Dashboard);
                        }
                        Ok(Err(err)) => error.set(Some(err.user_message())),
                        Err(err) => error.set(Some(err.to_string())),
                    }
                }
                AuthMode::Register => {
                    let result = run_blocking(move || session.register(&credentials)).await;
                    pending.set(false);
                    match result {
                        Ok(Ok(_)) => {
                            app.notify(Notification::success("Account created, please sign in"));
                            app.navigate(View::Login);
                        }
                        Ok(Err(err)) => error.set(Some(err.user_message())),
                        Err(err) => error.set(Some(err.to_string())),
                    }
                }
            }
        });
    };

    let color_mode = (app.color_mode)();
    let title = mode.title();
    let busy = pending();

    rsx! {
        div { style: "display: flex; flex: 1; align-items: center; justify-content: center;",
            div { style: "{panel_style(color_mode)} display: flex; flex-direction: column; gap: 12px; width: 320px;",
                h2 { style: "margin: 0;", "{title}" }
                label { style: "display: flex; flex-direction: column; gap: 4px;",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: email(),
                        oninput: move |event| email.set(event.value()),
                    }
                }
                label { style: "display: flex; flex-direction: column; gap: 4px;",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: password(),
                        oninput: move |event| password.set(event.value()),
                    }
                }
                if let Some(message) = error() {
                    div { style: "color: #dc2626;", "{message}" }
                }
                button {
                    style: "padding: 8px 12px; border-radius: 6px; border: none; background: #2563eb; color: #fff; cursor: pointer;",
                    disabled: busy,
                    onclick: submit,
                    if busy { "Please wait..." } else { "{title}" }
                }
                button {
                    style: "border: none; background: transparent; color: #60a5fa; cursor: pointer;",
                    onclick: move |_| app.navigate(mode.other_view()),
                    "{mode.switch_label()}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_link_to_each_other() {
        assert_eq!(AuthMode::SignIn.other_view(), View::Register);
        assert_eq!(AuthMode::Register.other_view(), View::Login);
        assert_eq!(AuthMode::Register.title(), "Create account");
    }
}
