//! Route paths and sidebar navigation helpers.

pub const HOME: &str = "/";
pub const SIGNIN: &str = "/signin";
pub const SIGNUP: &str = "/signup";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const DASHBOARD: &str = "/dashboard";
pub const DASHBOARD_SETTINGS: &str = "/dashboard/settings";
pub const DASHBOARD_PROFILE: &str = "/dashboard/profile";

/// Entry of the dashboard's main navigation. `title_key` is an i18n key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title_key: &'static str,
    pub url: &'static str,
}

pub const MAIN_NAV: [NavItem; 3] = [
    NavItem {
        title_key: "common.dashboard",
        url: DASHBOARD,
    },
    NavItem {
        title_key: "common.settings",
        url: DASHBOARD_SETTINGS,
    },
    NavItem {
        title_key: "common.profile",
        url: DASHBOARD_PROFILE,
    },
];

/// The navigation URL to highlight for `path`: the longest item URL that equals
/// `path` or prefixes it at a segment boundary. Defaults to the dashboard.
pub fn active_url(path: &str, items: &[NavItem]) -> &'static str {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    items
        .iter()
        .map(|item| item.url)
        .filter(|url| path == *url || path.starts_with(&format!("{url}/")))
        .max_by_key(|url| url.len())
        .unwrap_or(DASHBOARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_url_prefers_longest_match() {
        assert_eq!(active_url("/dashboard", &MAIN_NAV), DASHBOARD);
        assert_eq!(active_url("/dashboard/settings", &MAIN_NAV), DASHBOARD_SETTINGS);
        assert_eq!(active_url("/dashboard/profile/", &MAIN_NAV), DASHBOARD_PROFILE);
    }

    #[test]
    fn test_active_url_requires_segment_boundary() {
        assert_eq!(active_url("/dashboard/settingsx", &MAIN_NAV), DASHBOARD);
        assert_eq!(active_url("/elsewhere", &MAIN_NAV), DASHBOARD);
    }
}
