//! Helpers for relocatable references inside packed output.
//!
//! Filtering of references that never name a dependency and the slash-delimited
//! relative path computation live in separate submodules so each can be tested
//! in isolation.

mod filters;
mod relative;

pub use filters::is_external_reference;
pub use relative::relative_path;
