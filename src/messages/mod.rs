//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, Sync and
//! Network layers.

pub mod ui_events;
pub mod network;
pub mod sync;
pub mod render;

pub use ui_events::UiEvent;
pub use network::{NetworkCommand, NetworkResponse};
pub use sync::SyncCommand;
pub use render::RenderState;
