//! Password reset: request a link by email, or set a new password once the
//! link has been followed.

use dioxus::prelude::*;
use store::profile::change_password;
use store::{routes, AuthBackend};

use crate::auth::use_password_recovery;
use crate::backend::use_backend;
use crate::components::{Alert, Button, Field, Input};
use crate::form::use_form_input;
use crate::i18n::use_i18n;
use crate::platform;

const REDIRECT_DELAY_MS: u64 = 2_000;

#[component]
pub fn ResetPasswordView() -> Element {
    let recovery = use_password_recovery();
    let i18n = use_i18n();

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", {i18n.t("auth.resetPasswordTitle")} }
                if recovery() {
                    NewPasswordForm {}
                } else {
                    RequestLinkForm {}
                }
                p {
                    class: "auth-footer",
                    Link { to: routes::SIGNIN, {i18n.t("auth.backToSignIn")} }
                }
            }
        }
    }
}

#[component]
fn RequestLinkForm() -> Element {
    let backend = use_backend();
    let i18n = use_i18n();
    let form = use_form_input([("email", "")]);
    let mut error = use_signal(|| Option::<String>::None);
    let mut sent = use_signal(|| false);
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
            let redirect = format!("{}{}", platform::origin(), routes::RESET_PASSWORD);

            match backend.send_password_reset(&email, &redirect).await {
                Ok(()) => sent.set(true),
                Err(err) => {
                    tracing::warn!(error = %err, "reset email failed");
                    error.set(Some(
                        err.display_message()
                            .map(str::to_string)
                            .unwrap_or_else(|| i18n.t("auth.resetPasswordError")),
                    ));
                }
            }
            loading.set(false);
        });
    };

    if sent() {
        return rsx! {
            div { class: "alert alert-success", role: "status", {i18n.t("auth.resetEmailSent")} }
        };
    }

    rsx! {
        form {
            class: "auth-form",
            onsubmit: handle_submit,
            p { class: "auth-subtitle", {i18n.t("auth.resetPasswordSubtitle")} }
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
                    required: true,
                    value: form.get("email"),
                    oninput: form.on_change("email"),
                }
            }
            Button {
                r#type: "submit",
                class: "w-full",
                busy: loading(),
                {i18n.t("auth.sendResetLink")}
            }
        }
    }
}

#[component]
fn NewPasswordForm() -> Element {
    let backend = use_backend();
    let i18n = use_i18n();
    let nav = use_navigator();
    let form = use_form_input([("password", ""), ("confirm_password", "")]);
    let mut error = use_signal(|| Option::<String>::None);
    let mut done = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() || done() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let password = form.get("password");
            let confirm = form.get("confirm_password");

            let result = change_password(&backend, &password, &confirm).await;
            loading.set(false);
            match result {
                Ok(()) => {
                    done.set(true);
                    form.reset();
                    // The recovery session only served to set the password.
                    if let Err(err) = backend.sign_out().await {
                        tracing::warn!(error = %err, "could not end recovery session");
                    }
                    platform::sleep_ms(REDIRECT_DELAY_MS).await;
                    nav.push(routes::SIGNIN);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "password update failed");
                    let message = match err.backend_message() {
                        Some(msg) => msg.to_string(),
                        None => i18n.t(err.message_key("auth.updatePasswordError")),
                    };
                    error.set(Some(message));
                }
            }
        });
    };

    rsx! {
        form {
            class: "auth-form",
            onsubmit: handle_submit,
            p { class: "auth-subtitle", {i18n.t("auth.newPasswordSubtitle")} }
            if let Some(message) = error() {
                Alert { message, on_dismiss: move |_| error.set(None) }
            }
            if done() {
                div { class: "alert alert-success", role: "status", {i18n.t("auth.passwordUpdated")} }
            }
            Field {
                id: "password",
                label: i18n.t("auth.newPassword"),
                Input {
                    id: "password",
                    r#type: "password",
                    autocomplete: "new-password",
                    required: true,
                    value: form.get("password"),
                    oninput: form.on_change("password"),
                }
            }
            Field {
                id: "confirm_password",
                label: i18n.t("auth.confirmPassword"),
                Input {
                    id: "confirm_password",
                    r#type: "password",
                    autocomplete: "new-password",
                    required: true,
                    value: form.get("confirm_password"),
                    oninput: form.on_change("confirm_password"),
                }
            }
            Button {
                r#type: "submit",
                class: "w-full",
                busy: loading(),
                disabled: done(),
                {i18n.t("auth.updatePassword")}
            }
        }
    }
}
