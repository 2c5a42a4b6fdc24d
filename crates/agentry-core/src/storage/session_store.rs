//! Session state store trait.
//!
//! One JSON document per session. Both operations are deliberately
//! infallible at the trait boundary: a missing or corrupt document loads as
//! the default state, and a failed save is logged and swallowed, because a
//! turn must never be aborted by persistence trouble. Implementations live
//! in agentry-infra.

use agentry_types::session::SessionState;

/// Trait for loading and saving the per-session state document.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// Load the state for `session_id`, or `SessionState::default()` when
    /// nothing usable is stored.
    fn load(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = SessionState> + Send;

    /// Persist the state for `session_id`. Failures are logged, not raised.
    fn save(
        &self,
        session_id: &str,
        state: &SessionState,
    ) -> impl std::future::Future<Output = ()> + Send;
}
