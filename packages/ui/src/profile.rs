//! # Profile page controller
//!
//! [`use_profile`] wires the `store::profile` workflow to signals: the form
//! draft, the password fields, the staged avatar and one busy flag per action.
//! Each action is single-flight per user (a [`FlightSet`] key of action and
//! user id) and its busy flag is lowered by a drop guard, so every exit path
//! releases it.
//!
//! A picked avatar is staged as metadata plus a file handle. Its bytes are only
//! read once the upload passes validation against the `[avatars]` settings.

use dioxus::html::FileData;
use dioxus::prelude::*;
use store::profile::{self, AvatarFile, AvatarUpload, ProfileError, ProfileField, ProfileForm};
use store::{AppConfig, AvatarSection, FlightGuard, FlightSet, User};

use crate::auth::{use_auth, use_sign_out, SignOut};
use crate::backend::{use_backend, Backend};
use crate::busy::BusyFlag;
use crate::i18n::{use_i18n, I18n};
use crate::notifications::{use_notifications, Notifier};
use crate::platform;

/// A file picked for the avatar: what the picker reported, and a handle to
/// read its contents later.
#[derive(Clone)]
pub struct StagedAvatar {
    pub file: AvatarFile,
    handle: Option<FileData>,
}

impl StagedAvatar {
    /// The first file of a file-input change. The MIME type falls back to a
    /// guess from the file name. Nothing is read yet.
    pub fn from_event(evt: &FormEvent) -> Option<Self> {
        let handle = evt.files().into_iter().next()?;
        let name = handle.name();
        let content_type = handle
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| mime_guess::from_path(&name).first_or_octet_stream().to_string());
        Some(Self {
            file: AvatarFile::new(name, content_type, handle.size()),
            handle: Some(handle),
        })
    }

    async fn contents(handle: Option<FileData>) -> Result<Vec<u8>, ProfileError> {
        let handle = handle.ok_or_else(|| ProfileError::UnreadableAvatar("file handle released".into()))?;
        match handle.read_bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read selected file");
                Err(ProfileError::UnreadableAvatar(e.to_string()))
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct ProfileController {
    pub form: Signal<ProfileForm>,
    pub password: Signal<String>,
    pub confirm_password: Signal<String>,
    pub avatar: Signal<Option<StagedAvatar>>,
    pub saving: Signal<bool>,
    pub changing_pwd: Signal<bool>,
    pub uploading_avatar: Signal<bool>,
    user: Memo<Option<User>>,
    backend: Signal<Backend>,
    avatars: Signal<AvatarSection>,
    flights: Signal<FlightSet>,
    i18n: I18n,
    notifier: Notifier,
    signer: SignOut,
}

pub fn use_profile() -> ProfileController {
    let auth = use_auth();
    let backend = use_backend();
    let avatars = try_use_context::<AppConfig>().unwrap_or_default().avatars;
    let user = use_memo(move || auth.read().user.clone());
    let mut form = use_signal(|| ProfileForm::from_user(user.peek().as_ref()));

    // The draft follows the signed-in user, never the other way round.
    use_effect(move || form.set(ProfileForm::from_user(user.read().as_ref())));

    ProfileController {
        form,
        password: use_signal(String::new),
        confirm_password: use_signal(String::new),
        avatar: use_signal(|| None),
        saving: use_signal(|| false),
        changing_pwd: use_signal(|| false),
        uploading_avatar: use_signal(|| false),
        user,
        backend: use_signal(move || backend),
        avatars: use_signal(move || avatars),
        flights: use_signal(FlightSet::new),
        i18n: use_i18n(),
        notifier: use_notifications(),
        signer: use_sign_out(),
    }
}

impl ProfileController {
    pub fn set_field(&self, field: ProfileField, value: String) {
        let mut form = self.form;
        form.write().set(field, value);
    }

    /// Discards edits.
    pub fn reset_form(&self) {
        let mut form = self.form;
        form.set(ProfileForm::from_user(self.user.peek().as_ref()));
    }

    pub fn stage_avatar(&self, staged: Option<StagedAvatar>) {
        let mut avatar = self.avatar;
        avatar.set(staged);
    }

    fn report(&self, err: &ProfileError, fallback_key: &'static str) {
        tracing::warn!(error = %err, "profile action failed");
        let message = match err.backend_message() {
            Some(msg) => msg.to_string(),
            None => match err {
                ProfileError::AvatarTooLarge { limit, .. } => self.i18n.t_with(
                    err.message_key(fallback_key),
                    &[("size", &(limit / (1024 * 1024)).to_string())],
                ),
                _ => self.i18n.t(err.message_key(fallback_key)),
            },
        };
        self.notifier.error(message);
    }

    /// Starts `action` unless one is already in flight for this user.
    fn begin(&self, action: &str) -> Option<(FlightGuard, User)> {
        let user = self.user.peek().clone()?;
        let key = FlightSet::key(action, Some(&user.id));
        match self.flights.peek().try_begin(key) {
            Some(guard) => Some((guard, user)),
            None => {
                tracing::debug!(action, "already in flight");
                None
            }
        }
    }

    pub fn save_profile(&self) {
        let this = *self;
        let Some((flight, user)) = self.begin("save_profile") else {
            return;
        };
        spawn(async move {
            let _flight = flight;
            let _busy = BusyFlag::raise(this.saving);
            let backend = this.backend.peek().clone();
            let form = this.form.peek().clone();

            match profile::save_profile(&backend, &form, user.email.as_deref()).await {
                Ok(_) => this
                    .notifier
                    .success(this.i18n.t("profile.notifications.profileUpdated")),
                Err(err) => this.report(&err, "profile.errors.updateProfileError"),
            }
        });
    }

    pub fn change_password(&self) {
        let this = *self;
        let Some((flight, _)) = self.begin("change_password") else {
            return;
        };
        spawn(async move {
            let _flight = flight;
            let _busy = BusyFlag::raise(this.changing_pwd);
            let backend = this.backend.peek().clone();
            let password = this.password.peek().clone();
            let confirm = this.confirm_password.peek().clone();

            match profile::change_password(&backend, &password, &confirm).await {
                Ok(()) => {
                    let (mut p, mut c) = (this.password, this.confirm_password);
                    p.set(String::new());
                    c.set(String::new());
                    this.notifier
                        .success(this.i18n.t("profile.notifications.passwordUpdated"));
                }
                Err(err) => this.report(&err, "profile.errors.updatePasswordError"),
            }
        });
    }

    pub fn upload_avatar(&self) {
        let this = *self;
        let staged = self.avatar.peek().clone();
        let file = staged.as_ref().map(|s| s.file.clone());
        let user = self.user.peek().clone();
        let settings = self.avatars.peek().clone();

        // Validation failures never reach the backend or the flight set.
        if let Err(err) = profile::validate_avatar(file.as_ref(), user.as_ref(), &settings) {
            this.report(&err, "profile.errors.selectFile");
            return;
        }
        let Some((flight, user)) = self.begin("upload_avatar") else {
            return;
        };
        let handle = staged.and_then(|s| s.handle);
        spawn(async move {
            let _flight = flight;
            let _busy = BusyFlag::raise(this.uploading_avatar);
            let backend = this.backend.peek().clone();
            let draft = this.form.peek().clone();
            let mut form = this.form;

            let upload = AvatarUpload {
                file: file.as_ref(),
                contents: StagedAvatar::contents(handle),
                now_ms: platform::now_millis(),
            };
            let result = profile::upload_avatar(&backend, &settings, Some(&user), &draft, upload, |url| {
                form.write().avatar_url = url.to_string()
            })
            .await;

            match result {
                Ok(_) => {
                    let mut staged = this.avatar;
                    staged.set(None);
                    this.notifier
                        .success(this.i18n.t("profile.notifications.avatarUpdated"));
                }
                Err(err) => {
                    form.write().avatar_url = draft.avatar_url;
                    this.report(&err, "profile.errors.uploadAvatarError");
                }
            }
        });
    }

    pub fn sign_out(&self) {
        self.signer.run();
    }
}

#[cfg(test)]
impl StagedAvatar {
    fn detached(file: AvatarFile) -> Self {
        Self { file, handle: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::ToastLevel;
    use crate::ToastProvider;
    use api::{BackendConfig, HostedBackend};
    use dioxus::core::{current_scope_id, NoOpMutations, VirtualDom};
    use std::cell::Cell;
    use std::time::Duration;
    use store::SessionState;

    thread_local! {
        static CONTROLLER: Cell<Option<(ProfileController, ScopeId)>> = const { Cell::new(None) };
        static SIBLING: Cell<Option<ProfileController>> = const { Cell::new(None) };
    }

    fn ada() -> User {
        User {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            user_metadata: Default::default(),
        }
    }

    #[component]
    fn Root() -> Element {
        // Nothing listens on port 9; calls that need the network fail fast.
        use_context_provider(|| HostedBackend::new(BackendConfig::new("http://127.0.0.1:9", "k")));
        use_context_provider(|| {
            Signal::new(SessionState {
                user: Some(ada()),
                loading: false,
            })
        });
        use_context_provider(|| AppConfig {
            avatars: AvatarSection {
                max_size_bytes: 1024 * 1024,
                ..AvatarSection::default()
            },
            ..AppConfig::default()
        });
        crate::i18n::use_i18n_provider();
        rsx! {
            ToastProvider { ProfilePage {} }
        }
    }

    #[component]
    fn ProfilePage() -> Element {
        let controller = use_profile();
        CONTROLLER.with(|c| c.set(Some((controller, current_scope_id()))));
        let sibling = use_profile();
        SIBLING.with(|c| c.set(Some(sibling)));
        rsx! {}
    }

    async fn mounted() -> (VirtualDom, ProfileController, ScopeId) {
        let mut dom = VirtualDom::new(Root);
        dom.rebuild_in_place();
        settle(&mut dom).await;
        let (controller, scope) = CONTROLLER.with(Cell::get).expect("profile page mounted");
        (dom, controller, scope)
    }

    async fn settle(dom: &mut VirtualDom) {
        for _ in 0..3 {
            tokio::select! {
                _ = dom.wait_for_work() => {}
                _ = tokio::time::sleep(Duration::from_millis(5)) => {}
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    fn errors(dom: &VirtualDom, controller: &ProfileController) -> Vec<String> {
        dom.in_runtime(|| {
            controller
                .notifier
                .entries()
                .into_iter()
                .filter(|t| t.level == ToastLevel::Error)
                .map(|t| t.message)
                .collect()
        })
    }

    #[tokio::test]
    async fn test_controllers_compare_by_signal_identity() {
        let (mut dom, controller, _) = mounted().await;
        let sibling = SIBLING.with(Cell::get).expect("profile page mounted");
        let copy = controller;
        assert!(copy == controller);
        assert!(sibling != controller);

        dom.mark_dirty(ScopeId::ROOT);
        settle(&mut dom).await;
        let (rerendered, _) = CONTROLLER.with(Cell::get).expect("profile page mounted");
        assert!(rerendered == controller);
    }

    #[tokio::test]
    async fn test_second_action_is_rejected_while_first_in_flight() {
        let (dom, controller, scope) = mounted().await;
        dom.in_scope(scope, || {
            let first = controller.begin("save_profile");
            assert!(first.is_some());
            assert!(controller.begin("save_profile").is_none());
            assert!(controller.begin("change_password").is_some());
            drop(first);
            assert!(controller.begin("save_profile").is_some());
        });
    }

    #[tokio::test]
    async fn test_repeated_save_runs_once_and_lowers_busy_flag() {
        let (mut dom, controller, scope) = mounted().await;
        dom.in_scope(scope, || {
            controller.save_profile();
            controller.save_profile();
        });
        settle(&mut dom).await;

        // The client holds no session, so the single attempt fails locally.
        assert_eq!(errors(&dom, &controller), vec!["Auth session missing!".to_string()]);
        assert!(!dom.in_runtime(|| (controller.saving)()));
        let key = FlightSet::key("save_profile", Some("u1"));
        assert!(!dom.in_runtime(|| controller.flights.peek().is_active(&key)));
    }

    #[tokio::test]
    async fn test_oversized_avatar_uses_configured_limit() {
        let (mut dom, controller, scope) = mounted().await;
        let staged = StagedAvatar::detached(AvatarFile::new("me.png", "image/png", 2 * 1024 * 1024));
        dom.in_scope(scope, || {
            controller.stage_avatar(Some(staged));
            controller.upload_avatar();
        });
        settle(&mut dom).await;

        let expected = dom.in_runtime(|| {
            controller
                .i18n
                .t_with("profile.errors.avatarTooLarge", &[("size", "1")])
        });
        assert_eq!(errors(&dom, &controller), vec![expected]);
        assert!(!dom.in_runtime(|| (controller.uploading_avatar)()));
        let key = FlightSet::key("upload_avatar", Some("u1"));
        assert!(!dom.in_runtime(|| controller.flights.peek().is_active(&key)));
    }

    #[tokio::test]
    async fn test_unreadable_avatar_is_reported_and_draft_kept() {
        let (mut dom, controller, scope) = mounted().await;
        let staged = StagedAvatar::detached(AvatarFile::new("me.png", "image/png", 10));
        dom.in_scope(scope, || {
            controller.stage_avatar(Some(staged));
            controller.upload_avatar();
        });
        settle(&mut dom).await;

        let expected = dom.in_runtime(|| controller.i18n.t("profile.errors.unreadableAvatar"));
        assert_eq!(errors(&dom, &controller), vec![expected]);
        assert_eq!(dom.in_runtime(|| controller.form.peek().avatar_url.clone()), "");
        assert!(dom.in_runtime(|| controller.avatar.peek().is_some()));
        assert!(!dom.in_runtime(|| (controller.uploading_avatar)()));
    }
}
