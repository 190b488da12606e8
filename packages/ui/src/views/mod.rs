mod error_fallback;
pub use error_fallback::ErrorFallback;

mod profile;
pub use profile::ProfileView;

mod reset_password;
pub use reset_password::ResetPasswordView;

mod section_cards;
pub use section_cards::OverviewView;

mod settings;
pub use settings::SettingsView;

mod sign_in;
pub use sign_in::SignInView;

mod sign_up;
pub use sign_up::SignUpView;

mod site_header;
pub use site_header::SiteHeader;
