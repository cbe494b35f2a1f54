use log::trace;

use crate::error::PackResult;
use crate::graph::StagedRegistry;
use crate::models::{ModuleKind, ModuleMap};

/// A module reached for the first time during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Canonical id of the module.
    pub id: String,
    /// Slot assigned to it.
    pub slot: usize,
}

/// Depth-first walk from `entry` over every `deps` table, assigning slots.
///
/// A module is claimed on first visit, then its dependencies are walked in
/// declaration order before its siblings. Ids that already hold a slot, from
/// this walk or an earlier call, are skipped without re-traversal, which also
/// terminates cycles. Only newly claimed modules are returned, in claim order.
pub fn walk_dependencies(
    staged: &mut StagedRegistry<'_>,
    map: &ModuleMap,
    entry: &str,
) -> PackResult<Vec<Visit>> {
    let mut visits = Vec::new();
    let mut stack: Vec<(&str, Option<&str>)> = vec![(entry, None)];

    while let Some((id, referrer)) = stack.pop() {
        let record = map.require(id, referrer)?;
        let Some(slot) = staged.claim(id) else {
            continue;
        };
        trace!("assigned slot {slot} to {id}");
        visits.push(Visit {
            id: id.to_string(),
            slot,
        });

        if record.kind == ModuleKind::Asset {
            continue;
        }
        for dep in record.deps.values().rev() {
            stack.push((dep.as_str(), Some(record.id.as_str())));
        }
    }

    Ok(visits)
}
