//! Platform abstraction layer
//!
//! Browser-side input bookkeeping kept free of web-sys so it can be tested
//! natively.

pub mod input;

pub use input::{PointerTracker, backing_size};
