//! Routes reachable without an account.

use dioxus::prelude::*;
use ui::views::{ResetPasswordView, SignInView, SignUpView};
use ui::PublicRoute;

use crate::Route;

/// Sends signed-in users to the dashboard before rendering its children.
#[component]
pub fn PublicOnly() -> Element {
    rsx! {
        PublicRoute { Outlet::<Route> {} }
    }
}

#[component]
pub fn SignIn() -> Element {
    rsx! {
        SignInView {}
    }
}

#[component]
pub fn SignUp() -> Element {
    rsx! {
        SignUpView {}
    }
}

/// Not behind [`PublicOnly`]: following a recovery link signs the user in.
#[component]
pub fn ResetPassword() -> Element {
    rsx! {
        ResetPasswordView {}
    }
}
