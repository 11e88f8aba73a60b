//! # Auth State
//!
//! Current session plus simulated login, registration and logout.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Login / Register                                     │
//! │                                                                         │
//! │  validate form ── invalid ──► field errors, session untouched          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  register pending token, is_loading = true                             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  select! { backend call , token.cancelled() }                          │
//! │        │                          │                                     │
//! │        ▼                          ▼                                     │
//! │  user = Some(..)            Cancelled, result dropped                  │
//! │        │                          │                                     │
//! │        └────────► is_loading = (other requests pending) ◄┘              │
//! │                                                                         │
//! │  logout: cancel every pending token, then clear the session.           │
//! │  A request that resolves after logout can never sign the user back in. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent requests are not serialized: the last one to resolve wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use agri_core::validation::{validate_login, validate_profile, validate_registration};
use agri_core::{LoginForm, ProfileSettings, RegistrationForm, Session, User};
use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::DemoUserConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Backend
// =============================================================================

/// Source of authenticated users.
///
/// Implementations must be thread-safe (`Send + Sync`); requests from
/// several views may be in flight at once.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Signs a user in.
    async fn login(&self, form: &LoginForm) -> ApiResult<User>;

    /// Creates an account and signs it in.
    async fn register(&self, form: &RegistrationForm) -> ApiResult<User>;
}

#[async_trait]
impl<A: AuthBackend + ?Sized> AuthBackend for Arc<A> {
    async fn login(&self, form: &LoginForm) -> ApiResult<User> {
        (**self).login(form).await
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<User> {
        (**self).register(form).await
    }
}

/// Backend that accepts any credentials after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedAuthBackend {
    delay: Duration,
    demo: DemoUserConfig,
}

impl SimulatedAuthBackend {
    /// Creates a backend answering after `delay` with the `demo` profile.
    pub fn new(delay: Duration, demo: DemoUserConfig) -> Self {
        SimulatedAuthBackend { delay, demo }
    }
}

#[async_trait]
impl AuthBackend for SimulatedAuthBackend {
    async fn login(&self, form: &LoginForm) -> ApiResult<User> {
        tokio::time::sleep(self.delay).await;

        Ok(User {
            id: "1".to_string(),
            name: self.demo.name.clone(),
            email: form.email.trim().to_string(),
            phone: self.demo.phone.clone(),
            avatar: self.demo.avatar.clone(),
        })
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<User> {
        tokio::time::sleep(self.delay).await;

        Ok(User {
            id: Utc::now().timestamp_millis().to_string(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            avatar: None,
        })
    }
}

// =============================================================================
// Auth State
// =============================================================================

#[derive(Debug, Default)]
struct AuthInner {
    session: Session,
    profile: Option<ProfileSettings>,
}

/// Shared session state.
///
/// ## Lock Order
/// `pending` before `inner`. Neither is held across an `.await`.
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<RwLock<AuthInner>>,
    pending: Arc<Mutex<HashMap<u64, CancellationToken>>>,
    next_request: Arc<AtomicU64>,
    backend: Arc<dyn AuthBackend>,
}

impl AuthState {
    /// Creates a signed-out state on top of `backend`.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        AuthState {
            inner: Arc::new(RwLock::new(AuthInner::default())),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_request: Arc::new(AtomicU64::new(1)),
            backend,
        }
    }

    /// Snapshot of the session.
    pub fn session(&self) -> Session {
        self.read().session.clone()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.read().session.user.clone()
    }

    /// The signed-in user, or `Unauthenticated`.
    pub fn require_user(&self) -> ApiResult<User> {
        self.current_user().ok_or_else(ApiError::unauthenticated)
    }

    /// Profile settings of the signed-in user.
    pub fn profile(&self) -> ApiResult<ProfileSettings> {
        self.read()
            .profile
            .clone()
            .ok_or_else(ApiError::unauthenticated)
    }

    /// Signs in with any well-formed email and non-empty password.
    pub async fn login(&self, form: LoginForm, scope: &CancellationToken) -> ApiResult<Session> {
        validate_login(&form)?;
        debug!(email = %form.email.trim(), "Login requested");

        let backend = Arc::clone(&self.backend);
        self.authenticate("Login", scope, async move { backend.login(&form).await })
            .await
    }

    /// Registers a new account and signs it in.
    pub async fn register(
        &self,
        form: RegistrationForm,
        scope: &CancellationToken,
    ) -> ApiResult<Session> {
        validate_registration(&form)?;
        debug!(email = %form.email.trim(), "Registration requested");

        let backend = Arc::clone(&self.backend);
        self.authenticate("Registration", scope, async move {
            backend.register(&form).await
        })
        .await
    }

    /// Cancels pending requests and clears the session.
    pub fn logout(&self) -> Session {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, token) in pending.drain() {
            token.cancel();
        }

        let mut inner = self.write();
        if let Some(user) = inner.session.user.take() {
            info!(user_id = %user.id, "User signed out");
        }
        *inner = AuthInner::default();
        inner.session.clone()
    }

    /// Replaces the profile settings of the signed-in user.
    pub fn update_profile(&self, settings: ProfileSettings) -> ApiResult<ProfileSettings> {
        validate_profile(&settings)?;

        let mut inner = self.write();
        let user = inner
            .session
            .user
            .as_mut()
            .ok_or_else(ApiError::unauthenticated)?;

        user.name = settings.name.trim().to_string();
        user.email = settings.email.trim().to_string();
        user.phone = settings.phone.trim().to_string();
        debug!(user_id = %user.id, "Profile updated");

        inner.profile = Some(settings.clone());
        Ok(settings)
    }

    async fn authenticate<F>(
        &self,
        what: &'static str,
        scope: &CancellationToken,
        call: F,
    ) -> ApiResult<Session>
    where
        F: Future<Output = ApiResult<User>>,
    {
        let (request_id, token) = self.begin_request(scope);

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            result = call => Some(result),
        };

        self.finish_request(request_id, &token, what, outcome)
    }

    fn begin_request(&self, scope: &CancellationToken) -> (u64, CancellationToken) {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let token = scope.child_token();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.insert(request_id, token.clone());
        self.write().session.is_loading = true;

        (request_id, token)
    }

    fn finish_request(
        &self,
        request_id: u64,
        token: &CancellationToken,
        what: &'static str,
        outcome: Option<ApiResult<User>>,
    ) -> ApiResult<Session> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.remove(&request_id);
        let still_pending = !pending.is_empty();

        let mut inner = self.write();
        inner.session.is_loading = still_pending;

        match outcome {
            Some(Ok(user)) if !token.is_cancelled() => {
                info!(user_id = %user.id, "{} succeeded", what);
                inner.profile = Some(ProfileSettings::for_user(&user));
                inner.session.user = Some(user);
                Ok(inner.session.clone())
            }
            Some(Err(err)) if !token.is_cancelled() => Err(err),
            _ => {
                debug!(request_id, "{} cancelled", what);
                Err(ApiError::cancelled(what))
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const DELAY: Duration = Duration::from_millis(1000);

    fn auth() -> AuthState {
        AuthState::new(Arc::new(SimulatedAuthBackend::new(
            DELAY,
            DemoUserConfig::default(),
        )))
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "farmer@example.com".to_string(),
            password: "anything".to_string(),
        }
    }

    fn registration_form() -> RegistrationForm {
        RegistrationForm {
            name: "Rajesh Patel".to_string(),
            email: "rajesh@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_authenticates_after_delay() {
        let auth = auth();
        let scope = CancellationToken::new();

        let task = {
            let auth = auth.clone();
            let scope = scope.clone();
            tokio::spawn(async move { auth.login(login_form(), &scope).await })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        let pending = auth.session();
        assert!(pending.is_loading);
        assert!(!pending.is_authenticated());

        let session = task.await.unwrap().unwrap();
        assert!(session.is_authenticated());
        assert!(!session.is_loading);

        let user = auth.current_user().unwrap();
        assert!(!user.name.is_empty());
        assert_eq!(user.email, "farmer@example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_login_never_authenticates() {
        let auth = auth();
        let scope = CancellationToken::new();

        let task = {
            let auth = auth.clone();
            let scope = scope.clone();
            tokio::spawn(async move { auth.login(login_form(), &scope).await })
        };

        tokio::time::sleep(Duration::from_millis(200)).await;
        scope.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);

        tokio::time::sleep(DELAY * 2).await;
        let session = auth.session();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_pending_login_stays_logged_out() {
        let auth = auth();
        let scope = CancellationToken::new();

        let task = {
            let auth = auth.clone();
            let scope = scope.clone();
            tokio::spawn(async move { auth.login(login_form(), &scope).await })
        };

        tokio::time::sleep(Duration::from_millis(300)).await;
        let session = auth.logout();
        assert!(!session.is_authenticated());

        assert!(task.await.unwrap().is_err());
        assert!(!auth.session().is_authenticated());
        assert!(!scope.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_uses_timestamp_id() {
        let auth = auth();
        let session = auth
            .register(registration_form(), &CancellationToken::new())
            .await
            .unwrap();

        let user = session.user.unwrap();
        assert_eq!(user.name, "Rajesh Patel");
        assert!(!user.id.is_empty());
        assert!(user.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_does_not_touch_session() {
        let auth = auth();
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        };

        let err = auth
            .login(form, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.fields.len(), 2);
        assert_eq!(auth.session(), Session::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_profile_requires_auth() {
        let auth = auth();
        let settings = ProfileSettings {
            name: "Rajesh Patel".to_string(),
            email: "rajesh@example.com".to_string(),
            phone: "9876543210".to_string(),
            ..ProfileSettings::default()
        };

        let err = auth.update_profile(settings.clone()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        auth.login(login_form(), &CancellationToken::new())
            .await
            .unwrap();
        let updated = auth.update_profile(settings).unwrap();
        assert_eq!(updated.name, "Rajesh Patel");
        assert_eq!(auth.current_user().unwrap().email, "rajesh@example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_login_to_resolve_wins() {
        let auth = auth();
        let scope = CancellationToken::new();

        let first = {
            let auth = auth.clone();
            let scope = scope.clone();
            tokio::spawn(async move { auth.login(login_form(), &scope).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = {
            let auth = auth.clone();
            let scope = scope.clone();
            let form = LoginForm {
                email: "second@example.com".to_string(),
                password: "x".to_string(),
            };
            tokio::spawn(async move { auth.login(form, &scope).await })
        };

        let after_first = first.await.unwrap().unwrap();
        assert!(after_first.is_loading);

        second.await.unwrap().unwrap();
        let session = auth.session();
        assert!(!session.is_loading);
        assert_eq!(session.user.unwrap().email, "second@example.com");
    }
}
