mod auth;
pub use auth::{PublicOnly, ResetPassword, SignIn, SignUp};

mod dashboard;
pub use dashboard::{Dashboard, Overview, Profile, Settings};

mod not_found;
pub use not_found::NotFound;
