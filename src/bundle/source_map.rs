//! Inline source map covering every module emitted into a JavaScript bundle.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use crate::error::PackResult;

/// Marker preceding the encoded map in the trailing comment.
pub const SOURCE_MAPPING_URL_PREFIX: &str = "//# sourceMappingURL=data:application/json;base64,";

const VLQ_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapDocument<'a> {
    version: u8,
    sources: &'a [String],
    sources_content: &'a [String],
    names: [&'a str; 0],
    mappings: String,
}

/// Accumulates generated text positions while a bundle is written.
///
/// Each generated line of a module body maps to column 0 of the original line
/// with the same index; wrapper lines carry no mapping.
#[derive(Debug, Default, Clone)]
pub struct SourceMapComposer {
    sources: Vec<String>,
    contents: Vec<String>,
    lines: BTreeMap<usize, (usize, usize)>,
    line: usize,
}

impl SourceMapComposer {
    /// Create an empty composer positioned at the first generated line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for generated text that does not come from a module.
    pub fn push_text(&mut self, text: &str) {
        self.line += text.matches('\n').count();
    }

    /// Record a module body starting at the beginning of the current line.
    ///
    /// `rendered` must keep the line layout of `original`.
    pub fn push_module(&mut self, id: &str, original: &str, rendered: &str) {
        let source = self.sources.len();
        self.sources.push(id.to_string());
        self.contents.push(original.to_string());

        for index in 0..rendered.split('\n').count() {
            self.lines.insert(self.line + index, (source, index));
        }
        self.push_text(rendered);
    }

    /// Ids of recorded modules, in emission order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Serialise the map as JSON.
    pub fn to_json(&self) -> PackResult<String> {
        let document = SourceMapDocument {
            version: 3,
            sources: &self.sources,
            sources_content: &self.contents,
            names: [],
            mappings: self.encode_mappings(),
        };
        Ok(serde_json::to_string(&document)?)
    }

    /// Trailing comment embedding the map as a base64 data URL.
    pub fn to_comment(&self) -> PackResult<String> {
        let encoded = general_purpose::STANDARD.encode(self.to_json()?);
        Ok(format!("{SOURCE_MAPPING_URL_PREFIX}{encoded}"))
    }

    fn encode_mappings(&self) -> String {
        let Some(last_line) = self.lines.keys().next_back().copied() else {
            return String::new();
        };

        let mut mappings = String::new();
        let mut previous_source = 0i64;
        let mut previous_line = 0i64;
        for line in 0..=last_line {
            if line > 0 {
                mappings.push(';');
            }
            let Some(&(source, original_line)) = self.lines.get(&line) else {
                continue;
            };
            let (source, original_line) = (source as i64, original_line as i64);
            encode_vlq(&mut mappings, 0);
            encode_vlq(&mut mappings, source - previous_source);
            encode_vlq(&mut mappings, original_line - previous_line);
            encode_vlq(&mut mappings, 0);
            previous_source = source;
            previous_line = original_line;
        }
        mappings
    }
}

fn encode_vlq(out: &mut String, value: i64) {
    let mut remaining = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (remaining & 0b11111) as usize;
        remaining >>= 5;
        if remaining > 0 {
            digit |= 0b100000;
        }
        out.push(VLQ_ALPHABET[digit] as char);
        if remaining == 0 {
            break;
        }
    }
}
