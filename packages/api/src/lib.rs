//! # API crate: client for the hosted backend
//!
//! [`HostedBackend`] implements the three backend traits from `store` against a
//! Supabase-compatible project over HTTP:
//!
//! | Trait | Service | Module |
//! |-------|---------|--------|
//! | [`store::AuthBackend`] | GoTrue (`/auth/v1`) | [`auth`] |
//! | [`store::PreferencesBackend`] | PostgREST (`/rest/v1/user_preferences`) | [`rest`] |
//! | [`store::StorageBackend`] | Storage (`/storage/v1/object`) | [`storage`] |
//!
//! Every failure, whether transport, decoding or an HTTP error status, is
//! turned into a [`store::BackendError`] through [`ApiError`], so callers only
//! ever see the backend's message and status.
//!
//! The client keeps the current session in memory. On wasm it is also
//! persisted in `localStorage`, and a password-recovery link in the URL
//! fragment is adopted on the first session probe (see [`auth::session`]).

pub mod auth;
mod client;
pub mod error;
pub mod rest;
pub mod storage;
#[cfg(test)]
mod test_server;

pub use auth::config::BackendConfig;
pub use client::HostedBackend;
pub use error::ApiError;
