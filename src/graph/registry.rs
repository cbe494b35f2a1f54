use indexmap::IndexMap;

/// Mapping from canonical id to its numeric slot.
///
/// Slots start at 1 and grow by one per newly seen id. An id keeps its slot for
/// the lifetime of the registry; nothing is ever renumbered or removed.
#[derive(Debug, Default, Clone)]
pub struct IndexRegistry {
    slots: IndexMap<String, usize>,
}

impl IndexRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot previously assigned to `id`.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Whether `id` has a slot.
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Assigned `(id, slot)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), *slot))
    }

    /// Start a pack call whose assignments are only kept once committed.
    pub fn stage(&mut self) -> StagedRegistry<'_> {
        StagedRegistry {
            registry: self,
            pending: IndexMap::new(),
        }
    }
}

/// Assignments made during one pack call, layered over the committed registry.
///
/// Dropping the stage without [`StagedRegistry::commit`] discards them, which is
/// how a failed call leaves the registry untouched.
#[derive(Debug)]
pub struct StagedRegistry<'a> {
    registry: &'a mut IndexRegistry,
    pending: IndexMap<String, usize>,
}

impl StagedRegistry<'_> {
    /// Slot of `id`, whether committed earlier or staged in this call.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.registry
            .slot(id)
            .or_else(|| self.pending.get(id).copied())
    }

    /// Claim the next unused slot for `id`.
    ///
    /// Returns `None` when the id already has one.
    pub fn claim(&mut self, id: &str) -> Option<usize> {
        if self.slot(id).is_some() {
            return None;
        }
        let slot = self.registry.len() + self.pending.len() + 1;
        self.pending.insert(id.to_string(), slot);
        Some(slot)
    }

    /// Ids claimed in this call, in claim order.
    pub fn claimed(&self) -> impl Iterator<Item = (&str, usize)> {
        self.pending.iter().map(|(id, slot)| (id.as_str(), *slot))
    }

    /// Keep every staged assignment.
    pub fn commit(self) {
        self.registry.slots.extend(self.pending);
    }
}
