//! Theme management with localStorage persistence.
//!
//! The resolved theme is applied as a `light` or `dark` class on the document
//! root; `System` follows the OS `prefers-color-scheme`.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaCircleHalfStroke, FaMoon, FaSun};
use dioxus_free_icons::Icon;

use crate::i18n::use_i18n;

const STORAGE_KEY: &str = "vite-ui-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Theme::System => "settings.appearance.system",
            Theme::Light => "settings.appearance.light",
            Theme::Dark => "settings.appearance.dark",
        }
    }

    /// Class applied to the document root.
    pub fn css_class(&self, prefers_dark: bool) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System if prefers_dark => "dark",
            Theme::System => "light",
        }
    }

    /// Light → Dark → System → Light.
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }
}

/// Global theme state shared via context
#[derive(Clone, Copy, PartialEq)]
pub struct ThemeContext {
    pub current: Signal<Theme>,
}

impl ThemeContext {
    pub fn get(&self) -> Theme {
        (self.current)()
    }

    /// Set, apply and persist theme
    pub fn set(&self, theme: Theme) {
        let mut current = self.current;
        current.set(theme);
        apply_theme(theme);
        crate::platform::save_setting(STORAGE_KEY, theme.as_str());
    }
}

/// Initialize theme context provider - call once at app root
pub fn use_theme_provider() {
    let current = use_signal(|| {
        crate::platform::load_setting(STORAGE_KEY)
            .map(|s| Theme::parse(&s))
            .unwrap_or_default()
    });
    use_context_provider(|| ThemeContext { current });

    use_effect(move || apply_theme(current()));
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>()
}

#[cfg(target_arch = "wasm32")]
fn apply_theme(theme: Theme) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let prefers_dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .is_some_and(|m| m.matches());
    if let Some(root) = window.document().and_then(|d| d.document_element()) {
        let classes = root.class_list();
        let _ = classes.remove_2("light", "dark");
        let _ = classes.add_1(theme.css_class(prefers_dark));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_theme(_theme: Theme) {}

/// Header button cycling through the themes.
#[component]
pub fn ModeToggle() -> Element {
    let theme = use_theme();
    let i18n = use_i18n();
    let current = theme.get();

    rsx! {
        button {
            class: "btn btn-ghost btn-icon",
            title: i18n.t(current.label_key()),
            aria_label: i18n.t("common.toggleTheme"),
            onclick: move |_| theme.set(current.next()),
            match current {
                Theme::Light => rsx! { Icon { icon: FaSun, width: 16, height: 16 } },
                Theme::Dark => rsx! { Icon { icon: FaMoon, width: 16, height: 16 } },
                Theme::System => rsx! { Icon { icon: FaCircleHalfStroke, width: 16, height: 16 } },
            }
        }
    }
}

/// Radio-style theme picker for the settings page.
#[component]
pub fn ThemeSelector() -> Element {
    let theme = use_theme();
    let i18n = use_i18n();
    let current = theme.get();

    rsx! {
        div {
            class: "theme-options",
            for choice in Theme::ALL {
                label {
                    key: "{choice.as_str()}",
                    class: if choice == current { "theme-card theme-card-active" } else { "theme-card" },
                    onclick: move |_| theme.set(choice),
                    match choice {
                        Theme::Light => rsx! { Icon { icon: FaSun, width: 14, height: 14 } },
                        Theme::Dark => rsx! { Icon { icon: FaMoon, width: 14, height: 14 } },
                        Theme::System => rsx! { Icon { icon: FaCircleHalfStroke, width: 14, height: 14 } },
                    }
                    span { {i18n.t(choice.label_key())} }
                }
            }
        }
    }
}
