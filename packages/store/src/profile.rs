//! # Profile workflow
//!
//! The steps behind the profile page: the form draft, saving profile metadata,
//! changing the password, and uploading an avatar. Validation always runs
//! before any backend call; callers get a [`ProfileError`] they can localize
//! through [`ProfileError::message_key`].
//!
//! The UI hook owns the busy flags and single-flight guards; everything here is
//! a plain async function over the backend traits.
//!
//! Avatar bucket and size limit come from [`AvatarSection`]. A staged avatar
//! only carries the file's metadata; its contents are read after validation.

use std::future::Future;

use crate::backend::{AuthBackend, StorageBackend};
use crate::config::AvatarSection;
use crate::error::BackendError;
use crate::models::{ProfileMetadata, ProfileUpdate, User};

pub const AVATAR_BUCKET: &str = "avatars";
pub const MAX_AVATAR_SIZE: u64 = 5 * 1024 * 1024;

/// Editable copy of the user's profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileForm {
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Email,
    FullName,
    AvatarUrl,
}

impl ProfileForm {
    /// The draft derived from `user`; empty fields when signed out.
    pub fn from_user(user: Option<&User>) -> Self {
        Self {
            email: user.map(|u| u.email().to_string()).unwrap_or_default(),
            full_name: user
                .and_then(User::full_name)
                .map(str::to_string)
                .unwrap_or_default(),
            avatar_url: user
                .and_then(User::avatar_url)
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Email => self.email = value,
            ProfileField::FullName => self.full_name = value,
            ProfileField::AvatarUrl => self.avatar_url = value,
        }
    }

    /// Update body for this draft. `email` is only sent when it is non-empty
    /// and differs from `current_email`.
    pub fn to_update(&self, current_email: Option<&str>) -> ProfileUpdate {
        let email_changed = !self.email.is_empty() && Some(self.email.as_str()) != current_email;
        ProfileUpdate {
            email: email_changed.then(|| self.email.clone()),
            data: ProfileMetadata {
                full_name: self.full_name.clone(),
                avatar_url: self.avatar_url.clone(),
            },
        }
    }
}

/// Metadata of a file staged for upload, as reported by the file picker.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarFile {
    pub name: String,
    pub content_type: String,
    /// Declared size in bytes; checked before the contents are read.
    pub size: u64,
}

impl AvatarFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}

/// One avatar upload: the staged file and a future yielding its contents.
/// `contents` is only awaited once the file has passed [`validate_avatar`].
pub struct AvatarUpload<'a, C> {
    pub file: Option<&'a AvatarFile>,
    pub contents: C,
    pub now_ms: i64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("no avatar selected or no signed-in user")]
    MissingAvatar,
    #[error("selected file is not an image")]
    NotAnImage,
    #[error("avatar is {size} bytes, limit is {limit}")]
    AvatarTooLarge { size: u64, limit: u64 },
    #[error("could not read the selected file: {0}")]
    UnreadableAvatar(String),
    #[error("operation already in progress")]
    Busy,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ProfileError {
    /// i18n key of the message to show. Backend errors with a message of their
    /// own are shown verbatim; see [`ProfileError::backend_message`].
    pub fn message_key(&self, fallback: &'static str) -> &'static str {
        match self {
            ProfileError::PasswordMismatch => "profile.errors.passwordMismatch",
            ProfileError::MissingAvatar => fallback,
            ProfileError::NotAnImage => "profile.errors.notAnImage",
            ProfileError::AvatarTooLarge { .. } => "profile.errors.avatarTooLarge",
            ProfileError::UnreadableAvatar(_) => "profile.errors.unreadableAvatar",
            ProfileError::Busy => "profile.errors.busy",
            ProfileError::Backend(_) => fallback,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ProfileError::Backend(err) => err.display_message(),
            _ => None,
        }
    }
}

/// Saves the draft's metadata, and its email when changed.
pub async fn save_profile<B: AuthBackend>(
    backend: &B,
    form: &ProfileForm,
    current_email: Option<&str>,
) -> Result<User, ProfileError> {
    let update = form.to_update(current_email);
    let user = backend.update_user(&update).await?;
    tracing::info!(email_changed = update.email.is_some(), "profile saved");
    Ok(user)
}

/// Changes the password after checking it against its confirmation locally.
pub async fn change_password<B: AuthBackend>(
    backend: &B,
    password: &str,
    confirm_password: &str,
) -> Result<(), ProfileError> {
    if password.is_empty() || password != confirm_password {
        return Err(ProfileError::PasswordMismatch);
    }
    backend.update_password(password).await?;
    tracing::info!("password changed");
    Ok(())
}

/// Replaces every character outside `[a-zA-Z0-9.\-_]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object path of an avatar: `{user_id}/{now_ms}-{sanitized name}`.
pub fn avatar_path(user_id: &str, now_ms: i64, file_name: &str) -> String {
    format!("{user_id}/{now_ms}-{}", sanitize_file_name(file_name))
}

fn check_size(size: u64, settings: &AvatarSection) -> Result<(), ProfileError> {
    if size > settings.max_size_bytes {
        return Err(ProfileError::AvatarTooLarge {
            size,
            limit: settings.max_size_bytes,
        });
    }
    Ok(())
}

/// Local checks run before any upload. Returns the user id to upload under.
pub fn validate_avatar<'a>(
    file: Option<&AvatarFile>,
    user: Option<&'a User>,
    settings: &AvatarSection,
) -> Result<&'a str, ProfileError> {
    let (Some(file), Some(user)) = (file, user) else {
        return Err(ProfileError::MissingAvatar);
    };
    if user.id.is_empty() {
        return Err(ProfileError::MissingAvatar);
    }
    if !file.content_type.starts_with("image/") {
        return Err(ProfileError::NotAnImage);
    }
    check_size(file.size, settings)?;
    Ok(&user.id)
}

/// Uploads a staged file into the configured bucket as `user`'s avatar and
/// records its public URL in the profile.
///
/// The contents are read only after validation, and checked against the limit
/// again since the declared size comes from the browser. `on_stored` receives
/// the public URL as soon as the upload succeeds, before the profile update. If
/// the update then fails, the uploaded object is removed (best effort) and the
/// update error is returned.
pub async fn upload_avatar<B, C, F>(
    backend: &B,
    settings: &AvatarSection,
    user: Option<&User>,
    form: &ProfileForm,
    upload: AvatarUpload<'_, C>,
    on_stored: F,
) -> Result<User, ProfileError>
where
    B: AuthBackend + StorageBackend,
    C: Future<Output = Result<Vec<u8>, ProfileError>>,
    F: FnOnce(&str),
{
    let user_id = validate_avatar(upload.file, user, settings)?;
    let Some(file) = upload.file else {
        return Err(ProfileError::MissingAvatar);
    };
    let bytes = upload.contents.await?;
    check_size(bytes.len() as u64, settings)?;

    let bucket = settings.bucket.as_str();
    let path = avatar_path(user_id, upload.now_ms, &file.name);
    backend.upload(bucket, &path, bytes, &file.content_type).await?;
    let public_url = backend.public_url(bucket, &path);
    on_stored(&public_url);

    let mut draft = form.clone();
    draft.avatar_url = public_url;
    let current_email = user.and_then(|u| u.email.as_deref());
    match save_profile(backend, &draft, current_email).await {
        Ok(user) => Ok(user),
        Err(err) => {
            tracing::warn!(%path, error = %err, "profile update failed after avatar upload");
            if let Err(cleanup) = backend.remove(bucket, &path).await {
                tracing::error!(%path, error = %cleanup, "orphaned avatar left in storage");
            }
            Err(err)
        }
    }
}

/// Signs out. Navigation is up to the caller.
pub async fn sign_out<B: AuthBackend>(backend: &B) -> Result<(), ProfileError> {
    backend.sign_out().await?;
    Ok(())
}
