use leptos::prelude::*;
use vibefiction_shared::request::ApiCall;
use vibefiction_shared::LoginResponse;
use wasm_bindgen_futures::spawn_local;

use crate::{api, nav};

/// Reactive auth state shared via context.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub token: RwSignal<Option<String>>,
}

/// Provider component: wraps children with auth context.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let token = RwSignal::new(api::get_token());
    provide_context(AuthState { token });
    children()
}

/// Login form or logout button, depending on whether a token is stored.
#[component]
pub fn AuthPanel() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    let on_logout = move |_| {
        if !nav::confirm("Do you want to log out?") {
            return;
        }
        api::clear_token();
        auth.token.set(None);
        log::info!("logged out");
        nav::reload();
    };

    move || {
        if auth.token.get().is_some() {
            view! {
                <div class="user-buttons">
                    <button class="btn-logout" on:click=on_logout>"Logout"</button>
                </div>
            }
            .into_any()
        } else {
            view! { <LoginForm /> }.into_any()
        }
    }
}

#[component]
fn LoginForm() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let login_id = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let feedback: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        feedback.set(None);
        let call = ApiCall::Login {
            login_id: login_id.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        submitting.set(true);
        spawn_local(async move {
            match api::fetch::<LoginResponse>(&call).await {
                Ok(resp) => {
                    api::set_token(&resp.access_token);
                    auth.token.set(Some(resp.access_token));
                    log::info!("logged in");
                    nav::reload();
                }
                Err(e) => {
                    log::warn!("login failed: {e}");
                    feedback.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <form id="login-form" class="auth-buttons" on:submit=on_submit>
            <input
                class="login-input"
                type="text"
                name="loginId"
                placeholder="ID"
                prop:value=move || login_id.get()
                on:input=move |ev| login_id.set(event_target_value(&ev))
            />
            <input
                class="login-input"
                type="password"
                name="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <button class="btn-login" type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Logging in..." } else { "Login" }}
            </button>
            <Show when=move || feedback.get().is_some()>
                <p id="login-feedback" class="feedback-message error">
                    {move || feedback.get().unwrap_or_default()}
                </p>
            </Show>
        </form>
    }
}
