//! Core types shared by every stage of a pass.
//!
//! At present this is the error taxonomy: [`PluginError`] and the crate-wide
//! [`Result`] alias. See [`error`] for how each variant maps onto the stages
//! of template discovery, rendering and layout wrapping.

pub mod error;

pub use error::{PluginError, Result};
