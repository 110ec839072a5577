//! Occurrence slot allocation for repeated named elements.

use std::collections::BTreeMap;

/// Hands out zero-based occurrence indices per name within one scope.
///
/// One tracker lives per record (field names) and one per field
/// instance (subfield names); each is dropped when its scope closes, so
/// indices restart at zero in the next scope.
#[derive(Debug, Default)]
pub struct OccurrenceTracker {
    next: BTreeMap<String, u32>,
}

impl OccurrenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next slot for `name`: the Nth caller gets N-1.
    pub fn allocate(&mut self, name: &str) -> u32 {
        let slot = self.next.entry(name.to_string()).or_insert(0);
        let occurrence = *slot;
        *slot += 1;
        occurrence
    }
}
