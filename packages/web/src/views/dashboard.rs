//! The signed-in area: sidebar, header and the routed page.

use dioxus::prelude::*;
use store::AppConfig;
use ui::views::{OverviewView, ProfileView, SettingsView, SiteHeader};
use ui::{AppSidebar, PrivateRoute, SidebarOpen};

use crate::Route;

fn title_key(route: &Route) -> &'static str {
    match route {
        Route::Settings {} => "common.settings",
        Route::Profile {} => "common.profile",
        _ => "common.dashboard",
    }
}

#[component]
pub fn Dashboard() -> Element {
    let config = use_context::<AppConfig>();
    let route = use_route::<Route>();
    let open = use_signal(|| false);
    use_context_provider(|| SidebarOpen(open));

    rsx! {
        PrivateRoute {
            div {
                class: "dashboard",
                AppSidebar {
                    app_name: config.app.name.clone(),
                    current_path: route.to_string(),
                }
                div {
                    class: "dashboard-main",
                    SiteHeader { title_key: title_key(&route) }
                    main {
                        class: "dashboard-content",
                        Outlet::<Route> {}
                    }
                }
            }
        }
    }
}

#[component]
pub fn Overview() -> Element {
    rsx! {
        OverviewView {}
    }
}

#[component]
pub fn Settings() -> Element {
    rsx! {
        SettingsView {}
    }
}

#[component]
pub fn Profile() -> Element {
    rsx! {
        ProfileView {}
    }
}
