//! This crate contains all shared UI for the workspace: context providers,
//! hooks, components and the page views the web binary routes to.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

pub const MAIN_CSS: Asset = asset!("/assets/main.css");

mod platform;

mod backend;
pub use backend::{use_backend, Backend, BackendProvider};

mod auth;
pub use auth::{use_auth, use_password_recovery, use_sign_out, AuthProvider, SignOut};

mod busy;

mod guards;
pub use guards::{BusyScreen, HomeRedirect, PrivateRoute, PublicRoute};

pub mod i18n;
pub use i18n::{use_i18n, use_i18n_provider, I18n, LanguageSwitcher};

pub mod theme;
pub use theme::{use_theme, use_theme_provider, ModeToggle, Theme, ThemeSelector};

mod currency;
pub use currency::{use_currency, use_currency_provider, CurrencyContext, CurrencySelector};

pub mod notifications;
pub use notifications::{use_notifications, Notifier, ToastLevel, ToastProvider};

mod form;
pub use form::{use_form_input, FormHandle};

mod profile;
pub use profile::{use_profile, ProfileController, StagedAvatar};

mod preferences;
pub use preferences::{use_user_preferences, PreferencesHandle};

mod sidebar;
pub use sidebar::{use_sidebar, AppSidebar, SidebarOpen};
