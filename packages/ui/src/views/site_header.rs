use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaBars;
use dioxus_free_icons::Icon;

use crate::i18n::{use_i18n, LanguageSwitcher};
use crate::sidebar::use_sidebar;
use crate::theme::ModeToggle;

/// Top bar of the dashboard: sidebar trigger, page title and global toggles.
#[component]
pub fn SiteHeader(title_key: String) -> Element {
    let i18n = use_i18n();
    let mut open = use_sidebar();

    rsx! {
        header {
            class: "site-header",
            button {
                class: "btn btn-ghost btn-icon sidebar-trigger",
                aria_label: i18n.t("common.toggleSidebar"),
                onclick: move |_| open.toggle(),
                Icon { icon: FaBars, width: 16, height: 16 }
            }
            h1 { class: "site-header-title", {i18n.t(&title_key)} }
            div {
                class: "site-header-actions",
                LanguageSwitcher {}
                ModeToggle {}
            }
        }
    }
}
