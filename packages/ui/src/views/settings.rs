//! Settings page: local appearance plus the preferences saved on the backend.

use dioxus::prelude::*;
use store::{Currency, Language, PreferencesUpdate};

use crate::components::{Card, Skeleton};
use crate::i18n::use_i18n;
use crate::notifications::use_notifications;
use crate::preferences::use_user_preferences;
use crate::theme::ThemeSelector;

#[component]
pub fn SettingsView() -> Element {
    let i18n = use_i18n();
    let notifier = use_notifications();
    let prefs = use_user_preferences();

    let save = move |changes: PreferencesUpdate| async move {
        match prefs.update(changes).await {
            Ok(()) => notifier.success(i18n.t("settings.preferences.saved")),
            Err(err) => {
                tracing::warn!(error = %err, "preferences update failed");
                notifier.error(
                    err.display_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| i18n.t("settings.preferences.saveError")),
                );
            }
        }
    };

    let current = prefs.preferences.read().clone();
    let saving = (prefs.saving)();

    rsx! {
        div {
            class: "settings-page",
            Card {
                title: i18n.t("settings.appearance.title"),
                description: i18n.t("settings.appearance.description"),
                ThemeSelector {}
            }
            Card {
                title: i18n.t("settings.preferences.title"),
                description: i18n.t("settings.preferences.description"),
                if (prefs.loading)() {
                    Skeleton { class: "skeleton-line" }
                    Skeleton { class: "skeleton-line" }
                } else if let Some(current) = current {
                    div {
                        class: "field",
                        label { class: "label", r#for: "pref-language", {i18n.t("common.language")} }
                        select {
                            id: "pref-language",
                            class: "select",
                            disabled: saving,
                            value: current.language.code(),
                            onchange: move |evt: FormEvent| {
                                let Some(language) = Language::parse(&evt.value()) else {
                                    return;
                                };
                                i18n.set_language(language);
                                spawn(save(PreferencesUpdate::language(language)));
                            },
                            for choice in Language::ALL {
                                option {
                                    key: "{choice.code()}",
                                    value: choice.code(),
                                    selected: choice == current.language,
                                    "{choice.native_name()}"
                                }
                            }
                        }
                    }
                    div {
                        class: "field",
                        label { class: "label", r#for: "pref-currency", {i18n.t("dashboard.currency")} }
                        select {
                            id: "pref-currency",
                            class: "select",
                            disabled: saving,
                            value: current.currency.code(),
                            onchange: move |evt: FormEvent| {
                                if let Some(currency) = Currency::parse(&evt.value()) {
                                    spawn(save(PreferencesUpdate::currency(currency)));
                                }
                            },
                            for choice in Currency::ALL {
                                option {
                                    key: "{choice.code()}",
                                    value: choice.code(),
                                    selected: choice == current.currency,
                                    "{choice.code()}"
                                }
                            }
                        }
                    }
                } else {
                    p { class: "muted", {i18n.t("settings.preferences.unavailable")} }
                }
            }
        }
    }
}
