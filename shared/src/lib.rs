//! Shared types for the EV charging site optimizer
//!
//! Contains the contract types exchanged between the engine and its
//! collaborators: request/result models, dimension scores, error taxonomy,
//! geographic helpers and logging setup. Engine-internal types stay in the
//! optimizer crate.

pub mod errors;
pub mod geo;
pub mod logging;
pub mod models;
pub mod types;

pub use errors::*;
pub use models::*;
pub use types::*;
