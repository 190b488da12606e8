use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use api::{BackendConfig, HostedBackend};
use store::AppConfig;
use ui::views::ErrorFallback;
use ui::{AuthProvider, BackendProvider, HomeRedirect, ToastProvider};
use views::{Dashboard, NotFound, Overview, Profile, PublicOnly, ResetPassword, Settings, SignIn, SignUp};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[layout(PublicOnly)]
        #[route("/signin")]
        SignIn {},
        #[route("/signup")]
        SignUp {},
    #[end_layout]
    #[route("/reset-password")]
    ResetPassword {},
    #[layout(Dashboard)]
        #[route("/dashboard")]
        Overview {},
        #[route("/dashboard/settings")]
        Settings {},
        #[route("/dashboard/profile")]
        Profile {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const APP_CONFIG: &str = include_str!("../app.toml");

fn main() {
    dioxus::logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

/// Parses the bundled config and builds the backend client from it.
fn load_backend() -> Result<(AppConfig, HostedBackend), String> {
    let config = AppConfig::from_toml(APP_CONFIG).map_err(|e| e.to_string())?;
    let backend_config = BackendConfig::from_app_config(&config).map_err(|e| e.to_string())?;
    tracing::info!(url = %backend_config.url, "backend configured");
    Ok((config, HostedBackend::new(backend_config)))
}

#[component]
fn App() -> Element {
    let setup = use_hook(load_backend);
    use_context_provider(|| {
        setup
            .as_ref()
            .map(|(config, _)| config.clone())
            .unwrap_or_default()
    });
    ui::use_i18n_provider();
    ui::use_theme_provider();
    ui::use_currency_provider();

    let backend = match setup {
        Ok((_, backend)) => backend,
        Err(message) => {
            tracing::error!(%message, "invalid configuration");
            return rsx! {
                document::Link { rel: "stylesheet", href: ui::MAIN_CSS }
                ErrorFallback { message }
            };
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: ui::MAIN_CSS }

        BackendProvider {
            backend,
            AuthProvider {
                ToastProvider {
                    ErrorBoundary {
                        handle_error: |errors: ErrorContext| {
                            let message = errors.error().map(|e| e.to_string()).unwrap_or_default();
                            rsx! {
                                ErrorFallback { message, on_retry: move |_| errors.clear_errors() }
                            }
                        },
                        Router::<Route> {}
                    }
                }
            }
        }
    }
}

/// `/` waits for the session, then picks the dashboard or sign-in.
#[component]
fn Home() -> Element {
    rsx! {
        HomeRedirect {}
    }
}
