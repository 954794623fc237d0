//! Type definitions for web processes and extensions

mod extension_types;
mod web_types;

pub use extension_types::*;
pub use web_types::*;
