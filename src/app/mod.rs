//! App layer - central state management and command processing
//!
//! The App actor receives UI events, network responses and sync snapshots,
//! updates state, and emits network commands, sync commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod filter;
pub mod form;

pub use state::{AppState, DetailState};
pub use actor::AppActor;
pub use filter::{PackageFilter, StatusFilter};
pub use form::{FormField, FormState};
