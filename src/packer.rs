//! Packing orchestrator owning the module map and every per-kind packing state.

use log::debug;

use crate::bundle::{CssMerger, JsEmitter};
use crate::config::PackOptions;
use crate::error::PackResult;
use crate::models::{ModuleKind, ModuleMap, ModuleRecord};

/// High-level entry point turning a resolved module map into packed text.
///
/// All mutable state (slot registries, named-export table, inlined stylesheets)
/// lives in one instance and is never shared with another. Calls on the same
/// instance must be serialised by the caller.
#[derive(Debug)]
pub struct Packer {
    options: PackOptions,
    modules: ModuleMap,
    js: JsEmitter,
    css: CssMerger,
}

impl Packer {
    /// Create a packer with an empty module map.
    pub fn new(options: PackOptions) -> Self {
        Self::with_modules(ModuleMap::new(), options)
    }

    /// Create a packer over an existing module map.
    pub fn with_modules(modules: ModuleMap, options: PackOptions) -> Self {
        Self {
            options,
            modules,
            js: JsEmitter::new(options),
            css: CssMerger::new(),
        }
    }

    /// Options the packer was created with.
    pub fn options(&self) -> PackOptions {
        self.options
    }

    /// Module map fed so far.
    pub fn modules(&self) -> &ModuleMap {
        &self.modules
    }

    /// Feed another record. Records already present are never replaced.
    pub fn add(&mut self, record: ModuleRecord) -> PackResult<()> {
        self.modules.insert(record)
    }

    /// Terminal call packing `entry`.
    ///
    /// JavaScript output completes the bundle opened by earlier
    /// [`Packer::pack_chunk`] calls. Stylesheets return the merged text of
    /// everything not inlined before, and assets return their own id.
    pub fn pack(&mut self, entry: &str) -> PackResult<String> {
        self.dispatch(entry, true)
    }

    /// Non-terminal call: emits the modules newly reached from `entry` without
    /// closing the JavaScript loader. Behaves like [`Packer::pack`] for other kinds.
    pub fn pack_chunk(&mut self, entry: &str) -> PackResult<String> {
        self.dispatch(entry, false)
    }

    fn dispatch(&mut self, entry: &str, boot: bool) -> PackResult<String> {
        let kind = self.modules.require(entry, None)?.kind;
        debug!("packing {kind} entry {entry}");
        match kind {
            ModuleKind::Js => self.js.emit(&self.modules, entry, boot),
            ModuleKind::Css => self.css.merge(&self.modules, entry),
            ModuleKind::Asset => Ok(entry.to_string()),
        }
    }
}
