//! Cache Module
//!
//! Provides the typed cache facade with call instrumentation on writes.

mod facade;


// Re-export public types
pub use facade::{Cache, STORE_OPERATION};
