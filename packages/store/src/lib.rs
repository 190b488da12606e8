//! Backend-agnostic core of the dashboard: domain models, the backend traits the
//! hosted client implements, and the session/profile/preferences workflows the
//! UI hooks drive. Nothing in here depends on Dioxus, so every workflow can be
//! exercised against [`MemoryBackend`].

pub mod backend;
pub mod config;
pub mod currency;
pub mod error;
pub mod events;
pub mod flight;
pub mod form;
pub mod guard;
pub mod models;
pub mod preferences;
pub mod profile;
pub mod routes;
pub mod session;

mod memory;
pub use memory::{BackendCall, MemoryBackend};

pub use backend::{AuthBackend, PreferencesBackend, StorageBackend};
pub use config::{AppConfig, AvatarSection, ConfigError};
pub use currency::Currency;
pub use error::BackendError;
pub use events::{AuthEvent, AuthEventBus, AuthEventKind, AuthSubscription};
pub use flight::{FlightGuard, FlightSet};
pub use form::FormInput;
pub use guard::{Guard, GuardDecision};
pub use models::{
    Language, PreferencesUpdate, ProfileMetadata, ProfileUpdate, Session, SignUpOutcome, User,
    UserPreferences,
};
pub use profile::{AvatarFile, AvatarUpload, ProfileError, ProfileField, ProfileForm};
pub use session::{SessionState, SessionTracker};
