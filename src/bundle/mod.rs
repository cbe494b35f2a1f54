//! Renderers turning a walked module graph into packed text.

pub mod css;
pub mod js;
pub mod scan;
pub mod source_map;
pub mod umd;

pub use css::CssMerger;
pub use js::JsEmitter;
pub use source_map::SourceMapComposer;

/// Quote `value` as a JavaScript string literal.
pub(crate) fn string_literal(value: &str) -> String {
    serde_json::to_string(value).expect("string serialisation is infallible")
}
