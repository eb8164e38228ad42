//! Core definitions (errors, results and helper macros), relied upon by all termset-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
