//! Dependency graph traversal and stable slot assignment.
//!
//! Resolution of local specifiers, the slot registry and the depth-first walk
//! are kept apart so each rule can be tested on its own. Both the JavaScript
//! emitter and the CSS merger drive their traversal through these pieces.

mod registry;
mod resolve;
mod walk;

pub use registry::{IndexRegistry, StagedRegistry};
pub use resolve::resolve_specifier;
pub use walk::{Visit, walk_dependencies};
