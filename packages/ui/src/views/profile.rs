//! Profile page: account details, password and session cards.

use dioxus::prelude::*;
use store::ProfileField;

use crate::auth::use_auth;
use crate::components::{Avatar, Button, ButtonVariant, Card, Field, Input};
use crate::i18n::use_i18n;
use crate::profile::{use_profile, ProfileController, StagedAvatar};

#[component]
pub fn ProfileView() -> Element {
    let profile = use_profile();

    rsx! {
        div {
            class: "profile-page",
            InfoCard { profile }
            SecurityCard { profile }
            SessionCard { profile }
        }
    }
}

#[component]
fn InfoCard(profile: ProfileController) -> Element {
    let i18n = use_i18n();
    let form = profile.form.read().clone();
    let staged = profile.avatar.read().as_ref().map(|s| s.file.name.clone());
    let uploading = (profile.uploading_avatar)();
    let saving = (profile.saving)();

    let preview = (!form.avatar_url.is_empty()).then(|| form.avatar_url.clone());
    let display_name = if form.full_name.is_empty() {
        form.email.clone()
    } else {
        form.full_name.clone()
    };

    rsx! {
        Card {
            title: i18n.t("profile.info.title"),
            description: i18n.t("profile.info.description"),
            div {
                class: "avatar-row",
                Avatar { src: preview, name: display_name, class: "avatar-lg" }
                div {
                    class: "avatar-actions",
                    input {
                        id: "avatar",
                        class: "input",
                        r#type: "file",
                        accept: "image/*",
                        disabled: uploading,
                        onchange: move |evt: FormEvent| profile.stage_avatar(StagedAvatar::from_event(&evt)),
                    }
                    if let Some(name) = staged {
                        span { class: "muted", "{name}" }
                    }
                    Button {
                        variant: ButtonVariant::Secondary,
                        busy: uploading,
                        onclick: move |_| profile.upload_avatar(),
                        {i18n.t("profile.info.uploadAvatar")}
                    }
                }
            }
            form {
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    profile.save_profile();
                },
                Field {
                    id: "full_name",
                    label: i18n.t("profile.info.fullName"),
                    Input {
                        id: "full_name",
                        autocomplete: "name",
                        value: form.full_name.clone(),
                        oninput: move |evt: FormEvent| profile.set_field(ProfileField::FullName, evt.value()),
                    }
                }
                Field {
                    id: "email",
                    label: i18n.t("profile.info.email"),
                    Input {
                        id: "email",
                        r#type: "email",
                        autocomplete: "email",
                        value: form.email.clone(),
                        oninput: move |evt: FormEvent| profile.set_field(ProfileField::Email, evt.value()),
                    }
                }
                div {
                    class: "card-actions",
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: saving,
                        onclick: move |_| profile.reset_form(),
                        {i18n.t("common.reset")}
                    }
                    Button {
                        r#type: "submit",
                        busy: saving,
                        {i18n.t("common.save")}
                    }
                }
            }
        }
    }
}

#[component]
fn SecurityCard(profile: ProfileController) -> Element {
    let i18n = use_i18n();
    let (mut password, mut confirm) = (profile.password, profile.confirm_password);

    rsx! {
        Card {
            title: i18n.t("profile.security.title"),
            description: i18n.t("profile.security.description"),
            form {
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    profile.change_password();
                },
                Field {
                    id: "new_password",
                    label: i18n.t("profile.security.newPassword"),
                    Input {
                        id: "new_password",
                        r#type: "password",
                        autocomplete: "new-password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }
                Field {
                    id: "confirm_password",
                    label: i18n.t("profile.security.confirmPassword"),
                    Input {
                        id: "confirm_password",
                        r#type: "password",
                        autocomplete: "new-password",
                        value: confirm(),
                        oninput: move |evt: FormEvent| confirm.set(evt.value()),
                    }
                }
                div {
                    class: "card-actions",
                    Button {
                        r#type: "submit",
                        busy: (profile.changing_pwd)(),
                        {i18n.t("profile.security.updatePassword")}
                    }
                }
            }
        }
    }
}

#[component]
fn SessionCard(profile: ProfileController) -> Element {
    let i18n = use_i18n();
    let auth = use_auth();
    let email = auth
        .read()
        .user
        .as_ref()
        .map(|u| u.email().to_string())
        .unwrap_or_default();

    rsx! {
        Card {
            title: i18n.t("profile.session.title"),
            description: i18n.t("profile.session.description"),
            p {
                class: "muted",
                {i18n.t_with("profile.session.signedInAs", &[("email", &email)])}
            }
            div {
                class: "card-actions",
                Button {
                    variant: ButtonVariant::Destructive,
                    onclick: move |_| profile.sign_out(),
                    {i18n.t("common.signOut")}
                }
            }
        }
    }
}
