//! Common types, traits, and error definitions for nara_motion
//!
//! This module provides the foundational building blocks shared by the
//! world index, the planners and the expression engine.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
