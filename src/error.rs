//! Error types raised while packing a module map.

use thiserror::Error;

use crate::models::ModuleKind;

/// Result type alias using [`PackError`].
pub type PackResult<T> = Result<T, PackError>;

/// Failures raised synchronously during a pack call.
///
/// Every variant aborts the current call; nothing it staged is kept.
#[derive(Debug, Error)]
pub enum PackError {
    /// A module refers to a specifier missing from its `deps` table.
    #[error("unknown specifier {specifier:?} in module {module:?}")]
    UnknownSpecifier {
        /// Local specifier as written in the module source.
        specifier: String,
        /// Id of the module containing the reference.
        module: String,
    },

    /// A canonical id is not present in the module map.
    #[error("{}", unknown_module_message(.id, .referrer.as_deref()))]
    UnknownModule {
        /// Missing canonical id.
        id: String,
        /// Module whose `deps` named the id, `None` for a pack entry.
        referrer: Option<String>,
    },

    /// A module's kind cannot be handled by the operation reaching it.
    #[error("module {id:?} has type {kind}, expected {expected}")]
    UnsupportedType {
        /// Offending module id.
        id: String,
        /// Declared kind of the module.
        kind: ModuleKind,
        /// Kind the operation accepts.
        expected: ModuleKind,
    },

    /// A record with this id was already added; records are never replaced.
    #[error("module {id:?} is already registered")]
    DuplicateModule {
        /// Repeated canonical id.
        id: String,
    },

    /// The JavaScript loader was already closed by a boot call on this packer.
    #[error("the javascript bundle was already finished by a boot call")]
    Finished,

    /// The source map could not be serialised.
    #[error("failed to serialise source map: {0}")]
    SourceMap(#[from] serde_json::Error),
}

fn unknown_module_message(id: &str, referrer: Option<&str>) -> String {
    match referrer {
        Some(referrer) => format!("unknown module {id:?} required by {referrer:?}"),
        None => format!("unknown module {id:?}"),
    }
}
