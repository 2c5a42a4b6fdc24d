//! Storage abstractions for Agentry.
//!
//! Defines traits for session working-directory files and the persisted
//! session state document. Implementations live in agentry-infra.

pub mod files;
pub mod session_store;

pub use files::SessionFiles;
pub use session_store::SessionStore;
