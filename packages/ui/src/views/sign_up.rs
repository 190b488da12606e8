//! Account creation form.

use dioxus::prelude::*;
use store::{routes, AuthBackend};

use crate::backend::use_backend;
use crate::components::{Alert, Button, Field, Input};
use crate::form::use_form_input;
use crate::i18n::use_i18n;
use crate::platform;

const REDIRECT_DELAY_MS: u64 = 3_000;

#[component]
pub fn SignUpView() -> Element {
    let backend = use_backend();
    let i18n = use_i18n();
    let nav = use_navigator();
    let form = use_form_input([("full_name", ""), ("email", ""), ("password", "")]);
    let mut error = use_signal(|| Option::<String>::None);
    let mut success = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() || success() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let full_name = form.get("full_name").trim().to_string();
            let email = form.get("email").trim().to_string();
            let password = form.get("password");

            let result = backend.sign_up(&email, &password, &full_name).await;
            loading.set(false);
            match result {
                Ok(_) => {
                    success.set(true);
                    platform::sleep_ms(REDIRECT_DELAY_MS).await;
                    nav.push(routes::SIGNIN);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "sign up failed");
                    error.set(Some(
                        err.display_message()
                            .map(str::to_string)
                            .unwrap_or_else(|| i18n.t("auth.signUpError")),
                    ));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            form {
                class: "auth-card",
                onsubmit: handle_submit,

                h1 { class: "auth-title", {i18n.t("auth.signUpTitle")} }
                p { class: "auth-subtitle", {i18n.t("auth.signUpSubtitle")} }

                if let Some(message) = error() {
                    Alert { message, on_dismiss: move |_| error.set(None) }
                }
                if success() {
                    div { class: "alert alert-success", role: "status", {i18n.t("auth.signUpSuccess")} }
                }

                Field {
                    id: "full_name",
                    label: i18n.t("auth.fullName"),
                    Input {
                        id: "full_name",
                        autocomplete: "name",
                        required: true,
                        value: form.get("full_name"),
                        oninput: form.on_change("full_name"),
                    }
                }
                Field {
                    id: "email",
                    label: i18n.t("auth.email"),
                    Input {
                        id: "email",
                        r#type: "email",
                        autocomplete: "email",
                        placeholder: "m@example.com",
                        required: true,
                        value: form.get("email"),
                        oninput: form.on_change("email"),
                    }
                }
                Field {
                    id: "password",
                    label: i18n.t("auth.password"),
                    Input {
                        id: "password",
                        r#type: "password",
                        autocomplete: "new-password",
                        required: true,
                        value: form.get("password"),
                        oninput: form.on_change("password"),
                    }
                }

                Button {
                    r#type: "submit",
                    class: "w-full",
                    busy: loading(),
                    disabled: success(),
                    {i18n.t("auth.signUp")}
                }

                p {
                    class: "auth-footer",
                    {i18n.t("auth.haveAccount")}
                    " "
                    Link { to: routes::SIGNIN, {i18n.t("auth.signIn")} }
                }
            }
        }
    }
}
