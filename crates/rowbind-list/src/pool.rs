use std::collections::HashMap;

use smallvec::SmallVec;

pub type ViewType = u32;

/// Views detached from removed rows, kept per view type for reuse.
pub struct RecyclePool<V> {
    max_per_type: usize,
    scrap: HashMap<ViewType, SmallVec<[V; 4]>>,
}

impl<V> RecyclePool<V> {
    pub fn new(max_per_type: usize) -> Self {
        Self {
            max_per_type,
            scrap: HashMap::new(),
        }
    }

    /// Returns false (and drops the view) when the type's bucket is full.
    pub fn put(&mut self, view_type: ViewType, view: V) -> bool {
        let bucket = self.scrap.entry(view_type).or_default();
        if bucket.len() >= self.max_per_type {
            return false;
        }
        bucket.push(view);
        true
    }

    pub fn take(&mut self, view_type: ViewType) -> Option<V> {
        self.scrap.get_mut(&view_type)?.pop()
    }

    pub fn len(&self, view_type: ViewType) -> usize {
        self.scrap.get(&view_type).map_or(0, |b| b.len())
    }

    pub fn total(&self) -> usize {
        self.scrap.values().map(|b| b.len()).sum()
    }

    pub fn clear(&mut self) {
        self.scrap.clear();
    }
}
