//! # Auth Commands
//!
//! Session, login, registration, logout and profile settings.
//!
//! `login` and `register` are deferred: they wait for the simulated backend
//! and run under the requesting view's cancellation token.

use agri_core::{LoginForm, ProfileSettings, RegistrationForm, Session};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AuthState;

/// Gets the current session.
pub fn get_session(auth: &AuthState) -> Session {
    debug!("get_session command");
    auth.session()
}

/// Signs in. Any well-formed email and non-empty password succeed.
pub async fn login(
    auth: &AuthState,
    scope: &CancellationToken,
    form: LoginForm,
) -> ApiResult<Session> {
    debug!("login command");
    auth.login(form, scope).await
}

/// Creates an account and signs it in.
pub async fn register(
    auth: &AuthState,
    scope: &CancellationToken,
    form: RegistrationForm,
) -> ApiResult<Session> {
    debug!("register command");
    auth.register(form, scope).await
}

/// Signs out. Pending logins and registrations are abandoned.
pub fn logout(auth: &AuthState) -> Session {
    debug!("logout command");
    auth.logout()
}

/// Gets the profile settings of the signed-in user.
pub fn get_profile(auth: &AuthState) -> ApiResult<ProfileSettings> {
    debug!("get_profile command");
    auth.profile()
}

/// Saves the profile settings of the signed-in user.
pub fn update_profile(auth: &AuthState, settings: ProfileSettings) -> ApiResult<ProfileSettings> {
    debug!("update_profile command");
    auth.update_profile(settings)
}
