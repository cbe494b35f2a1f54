//! Data structures describing the resolved modules handed to the packer.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PackError, PackResult};

/// Closed set of module kinds understood by the packer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// JavaScript module using the CommonJS `require`/`module.exports` contract.
    #[default]
    Js,
    /// Stylesheet whose `@import` statements are inlined.
    Css,
    /// Any other dependency (image, font, ...); only its id is meaningful.
    Asset,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModuleKind::Js => "js",
            ModuleKind::Css => "css",
            ModuleKind::Asset => "asset",
        })
    }
}

/// A single resolved module.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ModuleRecord {
    /// Canonical, slash-delimited identifier unique within a map.
    #[serde(default)]
    pub id: String,
    /// Kind of the module body.
    #[serde(default, rename = "type")]
    pub kind: ModuleKind,
    /// Raw source text, ignored for assets.
    #[serde(default)]
    pub src: String,
    /// Local specifier to canonical id, in declaration order.
    #[serde(default)]
    pub deps: IndexMap<String, String>,
    /// Marks the root of a pack invocation.
    #[serde(default)]
    pub entry: bool,
    /// Name registered in the loader's named-export table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key the export is assigned to on the evaluation context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<String>,
}

impl ModuleRecord {
    /// Create a JavaScript record without dependencies.
    pub fn js(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self::new(id, ModuleKind::Js, src)
    }

    /// Create a stylesheet record without dependencies.
    pub fn css(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self::new(id, ModuleKind::Css, src)
    }

    /// Create an asset record.
    pub fn asset(id: impl Into<String>) -> Self {
        Self::new(id, ModuleKind::Asset, String::new())
    }

    fn new(id: impl Into<String>, kind: ModuleKind, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            src: src.into(),
            ..Self::default()
        }
    }

    /// Add a `deps` entry mapping `specifier` to the canonical `id`.
    pub fn with_dep(mut self, specifier: impl Into<String>, id: impl Into<String>) -> Self {
        self.deps.insert(specifier.into(), id.into());
        self
    }

    /// Flag the record as an entry.
    pub fn with_entry(mut self) -> Self {
        self.entry = true;
        self
    }

    /// Register the record under `name` in the named-export table.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Expose the record's export as `global` on the evaluation context.
    pub fn with_global(mut self, global: impl Into<String>) -> Self {
        self.global = Some(global.into());
        self
    }
}

/// Append-only mapping from canonical id to module record.
#[derive(Debug, Default, Clone)]
pub struct ModuleMap {
    modules: IndexMap<String, ModuleRecord>,
}

impl ModuleMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from records, rejecting repeated ids.
    pub fn from_records(records: impl IntoIterator<Item = ModuleRecord>) -> PackResult<Self> {
        let mut map = Self::new();
        for record in records {
            map.insert(record)?;
        }
        Ok(map)
    }

    /// Parse a JSON object keyed by module id.
    ///
    /// A record without an explicit `id` takes its key.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let raw: IndexMap<String, ModuleRecord> = serde_json::from_str(text)?;
        let records = raw.into_iter().map(|(key, mut record)| {
            if record.id.is_empty() {
                record.id = key;
            }
            record
        });
        Ok(Self::from_records(records)?)
    }

    /// Append a record. Existing records are never replaced.
    pub fn insert(&mut self, record: ModuleRecord) -> PackResult<()> {
        if self.contains(&record.id) {
            return Err(PackError::DuplicateModule { id: record.id });
        }
        self.modules.insert(record.id.clone(), record);
        Ok(())
    }

    /// Look up a record by canonical id.
    pub fn get(&self, id: &str) -> Option<&ModuleRecord> {
        self.modules.get(id)
    }

    /// Look up a record, failing with [`PackError::UnknownModule`].
    pub fn require(&self, id: &str, referrer: Option<&str>) -> PackResult<&ModuleRecord> {
        self.get(id).ok_or_else(|| PackError::UnknownModule {
            id: id.to_string(),
            referrer: referrer.map(str::to_string),
        })
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the map holds no records.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }
}
