//! Network layer - HTTP access to the courier backend
//!
//! The Network actor receives one-shot commands (submit, lookup) and sends
//! back responses. Polling lives in the sync layer and shares the same
//! `CourierApi` seam.

pub mod actor;
pub mod api;
pub mod client;
pub mod error;

pub use actor::NetworkActor;
pub use api::CourierApi;
pub use client::ApiClient;
pub use error::ApiError;
