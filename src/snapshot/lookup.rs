use crate::error::{Result, SnapshotError};
use indexmap::IndexMap;

/// Issues monotonically increasing references, starting after a caller offset
#[derive(Debug, Clone, Default)]
pub struct RefAllocator {
    value: u32,
}

impl RefAllocator {
    /// Create an allocator whose first reference is `start_id + 1`
    pub fn new(start_id: u32) -> Self {
        Self { value: start_id }
    }

    /// Allocate the next reference
    pub fn next_ref(&mut self) -> Result<u32> {
        self.value = self
            .value
            .checked_add(1)
            .ok_or(SnapshotError::ReferencesExhausted { last: self.value })?;
        Ok(self.value)
    }

    /// Last reference handed out (or the start offset if none was)
    pub fn current(&self) -> u32 {
        self.value
    }
}

/// Map of references to the document nodes they identify
/// Uses IndexMap to preserve pre-order insertion
#[derive(Debug, Clone)]
pub struct LookupTable<N> {
    map: IndexMap<u32, N>,
}

impl<N: Copy> LookupTable<N> {
    /// Create a new empty LookupTable
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Register a node under `node_ref`; returns the node previously stored there
    pub fn insert(&mut self, node_ref: u32, node: N) -> Option<N> {
        self.map.insert(node_ref, node)
    }

    /// Get node by reference
    pub fn get(&self, node_ref: u32) -> Option<N> {
        self.map.get(&node_ref).copied()
    }

    /// Check if reference exists
    pub fn contains(&self, node_ref: u32) -> bool {
        self.map.contains_key(&node_ref)
    }

    /// Get the number of registered nodes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all (reference, node) pairs in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.map.iter().map(|(node_ref, node)| (*node_ref, *node))
    }

    /// Get all references in pre-order
    pub fn refs(&self) -> impl Iterator<Item = u32> + '_ {
        self.map.keys().copied()
    }

    /// Find the reference of a node
    pub fn find_ref(&self, node: N) -> Option<u32>
    where
        N: PartialEq,
    {
        self.map
            .iter()
            .find(|(_, candidate)| **candidate == node)
            .map(|(node_ref, _)| *node_ref)
    }
}

impl<N: Copy> Default for LookupTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
