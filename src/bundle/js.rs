//! CommonJS runtime emitter.
//!
//! A bundle is one JavaScript expression evaluating to a `require` function.
//! Factories are keyed by slot in an object literal passed to the loader; the
//! loader's cache doubles as the per-slot state: absent (unvisited), present
//! while the factory runs (in progress) and present afterwards (done). A
//! cyclic `require` of an in-progress slot therefore sees the partial export.
//!
//! Packing may happen over several calls. The first call opens the loader, each
//! call appends the factories it reaches for the first time, and the boot call
//! closes the loader with the globals and named-export tables.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::bundle::scan::{replace_references, require_calls};
use crate::bundle::source_map::SourceMapComposer;
use crate::bundle::string_literal;
use crate::bundle::umd::{UMD_HEAD, umd_tail};
use crate::config::PackOptions;
use crate::error::{PackError, PackResult};
use crate::graph::{IndexRegistry, StagedRegistry, resolve_specifier, walk_dependencies};
use crate::models::{ModuleKind, ModuleMap, ModuleRecord};

const LOADER_HEAD: &str = r#"(function outer(modules, cache, globals, names){
  var context = typeof globalThis === 'object' ? globalThis : (function(){ return this; })();
  var has = Object.prototype.hasOwnProperty;

  function require(id){
    if (typeof id === 'string' && has.call(names, id)) id = names[id];
    if (has.call(cache, id)) return cache[id].exports;
    if (!has.call(modules, id)) throw new Error('cannot find module "' + id + '"');
    var module = cache[id] = { exports: {} };
    var done = false;
    try {
      modules[id].call(module.exports, require, module, module.exports);
      done = true;
    } finally {
      if (!done) delete cache[id];
    }
    return module.exports;
  }

  for (var slot in globals) {
    if (has.call(globals, slot)) context[globals[slot]] = require(+slot);
  }

  require.modules = modules;
  require.cache = cache;
  require.names = names;
  return require;
})({
"#;

const FACTORY_OPEN: &str = "function(require, module, exports){\n";
const FACTORY_CLOSE: &str = "\n}";

struct RenderedFactory<'a> {
    slot: usize,
    record: &'a ModuleRecord,
    body: String,
}

/// JavaScript packing state owned by one packer.
#[derive(Debug, Default)]
pub struct JsEmitter {
    options: PackOptions,
    registry: IndexRegistry,
    names: IndexMap<String, usize>,
    globals: BTreeMap<usize, String>,
    source_map: SourceMapComposer,
    opened: bool,
    factories: usize,
    finished: bool,
}

impl JsEmitter {
    /// Create an emitter with a fresh registry.
    pub fn new(options: PackOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Slots assigned so far.
    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// Named-export table accumulated so far.
    pub fn names(&self) -> &IndexMap<String, usize> {
        &self.names
    }

    /// Whether a boot call already closed the loader.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Emit every module reachable from `entry` that no earlier call emitted.
    ///
    /// With `boot` set the loader is closed and the returned text completes the
    /// bundle. A failing call emits nothing and leaves the state untouched.
    pub fn emit(&mut self, map: &ModuleMap, entry: &str, boot: bool) -> PackResult<String> {
        if self.finished {
            return Err(PackError::Finished);
        }
        let entry_record = map.require(entry, None)?;
        expect_kind(entry_record, ModuleKind::Js)?;

        let mut staged = self.registry.stage();
        let visits = walk_dependencies(&mut staged, map, entry)?;
        debug!(
            "packing javascript entry {entry}: {} new module(s), boot: {boot}",
            visits.len()
        );

        let mut rendered = Vec::with_capacity(visits.len());
        for visit in &visits {
            let record = map.require(&visit.id, None)?;
            rendered.push(RenderedFactory {
                slot: visit.slot,
                record,
                body: render_body(record, &staged)?,
            });
        }
        let entry_slot = staged.slot(entry);
        staged.commit();

        let mut output = String::new();
        if !self.opened {
            if self.options.umd {
                self.write(&mut output, UMD_HEAD);
            }
            self.write(&mut output, LOADER_HEAD);
            self.opened = true;
        }

        for factory in &rendered {
            self.write_factory(&mut output, factory);
            if let Some(name) = &factory.record.name {
                self.names.entry(name.clone()).or_insert(factory.slot);
            }
        }

        if let (Some(global), Some(slot)) = (&entry_record.global, entry_slot) {
            self.globals.entry(slot).or_insert_with(|| global.clone());
        }

        if boot {
            output.push_str(&self.close(map)?);
            self.finished = true;
        }

        Ok(output)
    }

    fn write(&mut self, output: &mut String, text: &str) {
        output.push_str(text);
        self.source_map.push_text(text);
    }

    fn write_factory(&mut self, output: &mut String, factory: &RenderedFactory<'_>) {
        let separator = if self.factories == 0 { "" } else { ",\n" };
        let header = format!("{separator}{}: {FACTORY_OPEN}", factory.slot);
        self.write(output, &header);

        output.push_str(&factory.body);
        match factory.record.kind {
            ModuleKind::Js => {
                self.source_map
                    .push_module(&factory.record.id, &factory.record.src, &factory.body)
            }
            _ => self.source_map.push_text(&factory.body),
        }

        self.write(output, FACTORY_CLOSE);
        self.factories += 1;
        trace!("emitted factory {} for {}", factory.slot, factory.record.id);
    }

    fn close(&self, map: &ModuleMap) -> PackResult<String> {
        let globals = serde_json::to_string(&self.globals)?;
        let names = serde_json::to_string(&self.names)?;
        let mut output = format!("\n}}, {{}}, {globals}, {names})");

        if self.options.umd {
            let name = self.registry
                .iter()
                .next()
                .map(|(id, _)| umd_export_name(map, id))
                .unwrap_or_default();
            output.push_str(&umd_tail(1, &name));
        }

        if self.options.development {
            output.push('\n');
            output.push_str(&self.source_map.to_comment()?);
        }
        Ok(output)
    }
}

fn expect_kind(record: &ModuleRecord, expected: ModuleKind) -> PackResult<()> {
    if record.kind == expected {
        Ok(())
    } else {
        Err(PackError::UnsupportedType {
            id: record.id.clone(),
            kind: record.kind,
            expected,
        })
    }
}

fn render_body(record: &ModuleRecord, staged: &StagedRegistry<'_>) -> PackResult<String> {
    match record.kind {
        ModuleKind::Js => {
            let calls = require_calls(&record.src);
            replace_references(&record.src, &calls, |call| {
                let id = resolve_specifier(record, call.value)?;
                let slot = staged.slot(id).ok_or_else(|| PackError::UnknownModule {
                    id: id.to_string(),
                    referrer: Some(record.id.clone()),
                })?;
                Ok(Some(format!("require({slot})")))
            })
        }
        ModuleKind::Asset => Ok(format!("module.exports = {};", string_literal(&record.id))),
        ModuleKind::Css => Err(PackError::UnsupportedType {
            id: record.id.clone(),
            kind: record.kind,
            expected: ModuleKind::Js,
        }),
    }
}

fn umd_export_name(map: &ModuleMap, id: &str) -> String {
    map.get(id)
        .and_then(|record| record.name.clone().or_else(|| record.global.clone()))
        .unwrap_or_else(|| id.to_string())
}
