use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaGaugeHigh, FaGear, FaRightFromBracket, FaUser};
use dioxus_free_icons::Icon;
use store::routes::{active_url, NavItem, MAIN_NAV};
use store::routes;

use crate::auth::{use_auth, use_sign_out};
use crate::components::Avatar;
use crate::i18n::use_i18n;

/// Whether the sidebar is open on narrow screens.
#[derive(Clone, Copy, PartialEq)]
pub struct SidebarOpen(pub Signal<bool>);

pub fn use_sidebar() -> Signal<bool> {
    use_context::<SidebarOpen>().0
}

#[component]
pub fn AppSidebar(app_name: String, current_path: String) -> Element {
    let mut open = use_sidebar();

    rsx! {
        aside {
            class: if open() { "sidebar sidebar-open" } else { "sidebar" },
            div {
                class: "sidebar-header",
                Link {
                    class: "sidebar-brand",
                    to: routes::DASHBOARD,
                    onclick: move |_| open.set(false),
                    "{app_name}"
                }
            }
            NavMain { items: MAIN_NAV.to_vec(), current_path }
            div { class: "sidebar-footer", NavUser {} }
        }
        if open() {
            div { class: "sidebar-backdrop", onclick: move |_| open.set(false) }
        }
    }
}

fn nav_icon(url: &str) -> Element {
    match url {
        routes::DASHBOARD_SETTINGS => rsx! { Icon { icon: FaGear, width: 14, height: 14 } },
        routes::DASHBOARD_PROFILE => rsx! { Icon { icon: FaUser, width: 14, height: 14 } },
        _ => rsx! { Icon { icon: FaGaugeHigh, width: 14, height: 14 } },
    }
}

#[component]
fn NavMain(items: Vec<NavItem>, current_path: String) -> Element {
    let i18n = use_i18n();
    let mut open = use_sidebar();
    let active = active_url(&current_path, &items);

    rsx! {
        nav {
            class: "sidebar-nav",
            ul {
                for item in items {
                    li {
                        key: "{item.url}",
                        Link {
                            class: if item.url == active { "nav-item nav-item-active" } else { "nav-item" },
                            to: item.url,
                            onclick: move |_| open.set(false),
                            {nav_icon(item.url)}
                            span { {i18n.t(item.title_key)} }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn NavUser() -> Element {
    let auth = use_auth();
    let i18n = use_i18n();
    let sign_out = use_sign_out();

    let Some(user) = auth.read().user.clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "nav-user",
            Avatar {
                src: user.avatar_url().map(str::to_string),
                name: user.display_name().to_string(),
            }
            div {
                class: "nav-user-text",
                span { class: "nav-user-name", "{user.display_name()}" }
                span { class: "nav-user-email", "{user.email()}" }
            }
            button {
                class: "btn btn-ghost btn-icon",
                title: i18n.t("common.signOut"),
                onclick: move |_| sign_out.run(),
                Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            }
        }
    }
}
