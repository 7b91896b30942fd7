//! Common types used across the C2CX client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
