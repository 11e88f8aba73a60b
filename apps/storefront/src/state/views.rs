//! # View Scopes
//!
//! One cancellation token per frontend view. Delayed operations started from
//! a view (login, registration, order placement) run under a child of that
//! view's token, so closing the view abandons them.
//!
//! ```text
//!   root ──┬── "login"     ──► login request token
//!          ├── "checkout"  ──► place-order token
//!          └── ...
//!
//!   close("login")  cancels only the login request
//!   shutdown()      cancels everything
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation scopes keyed by view name.
#[derive(Debug, Clone, Default)]
pub struct ViewScopes {
    root: CancellationToken,
    views: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl ViewScopes {
    /// Creates an empty set of scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of `view`, created on first use.
    pub fn token(&self, view: &str) -> CancellationToken {
        let mut views = self.views.lock().unwrap_or_else(PoisonError::into_inner);
        views
            .entry(view.to_string())
            .or_insert_with(|| self.root.child_token())
            .clone()
    }

    /// Cancels everything started from `view`. Returns whether the view was open.
    pub fn close(&self, view: &str) -> bool {
        let removed = self
            .views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(view);

        match removed {
            Some(token) => {
                debug!(view, "Closing view, cancelling its pending work");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every view.
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_cancels_only_that_view() {
        let scopes = ViewScopes::new();
        let login = scopes.token("login");
        let checkout = scopes.token("checkout");

        assert!(scopes.close("login"));
        assert!(login.is_cancelled());
        assert!(!checkout.is_cancelled());
        assert!(!scopes.close("login"));

        // Reopening gives a fresh token.
        assert!(!scopes.token("login").is_cancelled());
    }

    #[test]
    fn test_shutdown_cancels_all() {
        let scopes = ViewScopes::new();
        let a = scopes.token("a");
        let b = scopes.token("b");
        scopes.shutdown();
        assert!(a.is_cancelled() && b.is_cancelled());
    }
}
