//! Shared domain for the Sindh crop & weather advisory dashboard
//!
//! Value types, reference tables and the advisory engine. Used by the
//! backend service and, through WASM, by the browser client.

pub mod advisory;
pub mod models;
pub mod reference;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
