//! Email/password sign-in form.

use dioxus::prelude::*;
use store::{routes, AuthBackend};

use crate::backend::use_backend;
use crate::components::{Alert, Button, Field, Input};
use crate::form::use_form_input;
use crate::i18n::use_i18n;
use crate::notifications::use_notifications;

#[component]
pub fn SignInView() -> Element {
    let backend = use_backend();
    let i18n = use_i18n();
    let notifier = use_notifications();
    let nav = use_navigator();
    let form = use_form_input([("email", ""), ("password", "")]);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let email = form.get("email").trim().to_string();
            let password = form.get("password");

            match backend.sign_in(&email, &password).await {
                Ok(_) => {
                    notifier.success(i18n.t("auth.signInSuccess"));
                    nav.push(routes::DASHBOARD);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "sign in failed");
                    error.set(Some(
                        err.display_message()
                            .map(str::to_string)
                            .unwrap_or_else(|| i18n.t("auth.signInError")),
                    ));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            form {
                class: "auth-card",
                onsubmit: handle_submit,

                h1 { class: "auth-title", {i18n.t("auth.signInTitle")} }
                p { class: "auth-subtitle", {i18n.t("auth.signInSubtitle")} }

                if let Some(message) = error() {
                    Alert { message, on_dismiss: move |_| error.set(None) }
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
                        autocomplete: "current-password",
                        required: true,
                        value: form.get("password"),
                        oninput: form.on_change("password"),
                    }
                }
                div {
                    class: "auth-links",
                    Link { to: routes::RESET_PASSWORD, {i18n.t("auth.forgotPassword")} }
                }

                Button {
                    r#type: "submit",
                    class: "w-full",
                    busy: loading(),
                    {i18n.t("auth.signIn")}
                }

                p {
                    class: "auth-footer",
                    {i18n.t("auth.noAccount")}
                    " "
                    Link { to: routes::SIGNUP, {i18n.t("auth.signUp")} }
                }
            }
        }
    }
}
