use crate::error::{PackError, PackResult};
use crate::models::ModuleRecord;

/// Map a local specifier used inside `module` to its canonical id.
///
/// Distinct specifiers aliasing the same id resolve to the same string, so the
/// caller's registry sees a single graph node for all of them.
pub fn resolve_specifier<'a>(module: &'a ModuleRecord, specifier: &str) -> PackResult<&'a str> {
    module
        .deps
        .get(specifier)
        .map(String::as_str)
        .ok_or_else(|| PackError::UnknownSpecifier {
            specifier: specifier.to_string(),
            module: module.id.clone(),
        })
}
