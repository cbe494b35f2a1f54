//! Stylesheet merging with `@import` inlining and relocatable `url(...)` references.

use log::{debug, trace};

use crate::bundle::scan::{import_statements, replace_references, url_references};
use crate::error::{PackError, PackResult};
use crate::graph::{IndexRegistry, StagedRegistry, resolve_specifier};
use crate::models::{ModuleKind, ModuleMap, ModuleRecord};
use crate::paths::{is_external_reference, relative_path};

const PART_SEPARATOR: &str = "\n\n";

/// CSS packing state owned by one packer.
///
/// A stylesheet is inlined the first time any module imports it, across every
/// call on the same merger; later imports of it are dropped.
#[derive(Debug, Default)]
pub struct CssMerger {
    registry: IndexRegistry,
}

impl CssMerger {
    /// Create a merger that has not inlined anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stylesheets inlined so far, in first-encounter order.
    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// Merge `entry` and every stylesheet it imports that is not inlined yet.
    ///
    /// `url(...)` references are rewritten relative to the directory of `entry`.
    /// An entry merged by an earlier call yields an empty string.
    pub fn merge(&mut self, map: &ModuleMap, entry: &str) -> PackResult<String> {
        let record = map.require(entry, None)?;
        expect_stylesheet(record)?;

        let mut staged = self.registry.stage();
        let merged = if staged.claim(entry).is_some() {
            merge_stylesheet(&mut staged, map, record, entry)?
        } else {
            String::new()
        };
        debug!(
            "merged stylesheet entry {entry}: {} new stylesheet(s)",
            staged.claimed().count()
        );
        staged.commit();
        Ok(merged)
    }
}

fn expect_stylesheet(record: &ModuleRecord) -> PackResult<()> {
    if record.kind == ModuleKind::Css {
        return Ok(());
    }
    Err(PackError::UnsupportedType {
        id: record.id.clone(),
        kind: record.kind,
        expected: ModuleKind::Css,
    })
}

/// Inline the imports of `record` in place.
///
/// Each local `@import` is replaced by the merged text of its stylesheet, or
/// dropped when that stylesheet was already inlined. The surviving pieces keep
/// their source order and are joined by one blank line. External imports stay
/// where they are written.
fn merge_stylesheet(
    staged: &mut StagedRegistry<'_>,
    map: &ModuleMap,
    record: &ModuleRecord,
    anchor: &str,
) -> PackResult<String> {
    let src = record.src.as_str();
    let mut segments: Vec<String> = Vec::new();
    let mut last = 0;

    for import in import_statements(src) {
        if is_external_reference(import.value) {
            continue;
        }
        let id = resolve_specifier(record, import.value)?;
        let dependency = map.require(id, Some(&record.id))?;
        expect_stylesheet(dependency)?;

        let before = rewrite_urls(map, record, &src[last..import.start], anchor)?;
        push_segment(&mut segments, before);
        last = import.end;

        if staged.claim(id).is_none() {
            trace!("dropping repeated import of {id} in {}", record.id);
            continue;
        }
        let inlined = merge_stylesheet(staged, map, dependency, anchor)?;
        push_segment(&mut segments, inlined);
    }

    if last == 0 {
        return rewrite_urls(map, record, src, anchor);
    }
    let rest = rewrite_urls(map, record, &src[last..], anchor)?;
    push_segment(&mut segments, rest);
    Ok(segments.join(PART_SEPARATOR))
}

fn push_segment(segments: &mut Vec<String>, text: String) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(text.to_string());
    }
}

fn rewrite_urls(
    map: &ModuleMap,
    record: &ModuleRecord,
    text: &str,
    anchor: &str,
) -> PackResult<String> {
    let urls = url_references(text);
    replace_references(text, &urls, |url| {
        if is_external_reference(url.value) {
            return Ok(None);
        }
        let id = resolve_specifier(record, url.value)?;
        map.require(id, Some(&record.id))?;
        let path = relative_path(anchor, id);
        trace!("rewrote url {} in {} to {path}", url.value, record.id);
        Ok(Some(match url.quote {
            Some(quote) => format!("url({quote}{path}{quote})"),
            None => format!("url({path})"),
        }))
    })
}
