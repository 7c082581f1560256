//! Login Form Component
//!
//! Sign-in and account creation on one card, toggled by a link button.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{Services, SessionContext};
use crate::errors::ApiError;
use crate::models::{Credentials, Registration};

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Transport(_) => "Error connecting to server".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let session = use_context::<SessionContext>().expect("SessionContext should be provided");
    let services = use_context::<Services>().expect("Services should be provided");

    let (is_login, set_is_login) = signal(true);
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let toggle_mode = move |_| {
        set_is_login.update(|v| *v = !*v);
        set_message.set(String::new());
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_submitting.set(true);
        let login_mode = is_login.get_untracked();
        let user = username.get_untracked();
        let pass = password.get_untracked();
        let mail = email.get_untracked();

        spawn_local(async move {
            let auth = services.auth();
            if login_mode {
                let credentials = Credentials { username: user, password: pass };
                match auth.login(&credentials).await {
                    Ok(_) => {
                        set_message.set("Login successful!".to_string());
                        set_password.set(String::new());
                        session.signed_in();
                    }
                    Err(err) => set_message.set(failure_message(&err)),
                }
            } else {
                let registration = Registration {
                    username: user,
                    password: pass,
                    email: Some(mail),
                };
                match auth.register(&registration).await {
                    Ok(_) => {
                        set_message.set("Account created successfully!".to_string());
                        set_password.set(String::new());
                    }
                    Err(err) => set_message.set(failure_message(&err)),
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=submit>
                <h1>{move || if is_login.get() { "Login" } else { "Create Account" }}</h1>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <Show when=move || !is_login.get()>
                    <input
                        type="email"
                        placeholder="Email (optional)"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </Show>
                <button type="submit" disabled=move || submitting.get()>
                    {move || if is_login.get() { "Login" } else { "Create Account" }}
                </button>
                <Show when=move || !message.get().is_empty()>
                    <p class="auth-message">{move || message.get()}</p>
                </Show>
                <button type="button" class="link-btn" on:click=toggle_mode>
                    {move || {
                        if is_login.get() {
                            "Need an account? Create one"
                        } else {
                            "Already have an account? Login"
                        }
                    }}
                </button>
            </form>
        </div>
    }
}
