use crate::views::RecordingDetail;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::{debug, warn};
use uuid::Uuid;

/// Detail view shared between the cache and its presentation layer.
pub type SharedDetail = Arc<Mutex<RecordingDetail>>;

/// One [`RecordingDetail`] per recording id, built on first access.
///
/// Unbounded; entries leave only through [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct DerivedViewCache {
    views: HashMap<Uuid, SharedDetail>,
}

impl DerivedViewCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for `id`, building it with `build` on first access.
    pub fn get_or_insert_with(
        &mut self,
        id: Uuid,
        build: impl FnOnce() -> RecordingDetail,
    ) -> SharedDetail {
        Arc::clone(self.views.entry(id).or_insert_with(|| {
            debug!(recording_id = %id, "Building detail view");
            Arc::new(Mutex::new(build()))
        }))
    }

    /// Cached view for `id`, if one was built.
    pub fn get(&self, id: Uuid) -> Option<SharedDetail> {
        self.views.get(&id).map(Arc::clone)
    }

    /// Drop the view for `id`. Returns whether one existed.
    pub fn invalidate(&mut self, id: Uuid) -> bool {
        let removed = self.views.remove(&id).is_some();
        if removed {
            debug!(recording_id = %id, "Detail view evicted");
        }
        removed
    }

    /// Capture `ordered` for every cached view without locking any of them.
    pub(crate) fn order_sync(&self, generation: u64, ordered: Vec<Uuid>) -> OrderSync {
        OrderSync {
            generation,
            ordered,
            views: self.views.values().map(Arc::clone).collect(),
        }
    }

    /// True if a view is cached for `id`.
    pub fn contains(&self, id: Uuid) -> bool {
        self.views.contains_key(&id)
    }

    /// Number of cached views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True when no views are cached.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Catalog order waiting to be pushed into cached views.
///
/// Taken under the catalog lock, applied after it is released. Views already
/// at a newer generation ignore it.
#[must_use = "cached views keep their old order until the sync is applied"]
#[derive(Debug)]
pub struct OrderSync {
    generation: u64,
    ordered: Vec<Uuid>,
    views: Vec<SharedDetail>,
}

impl OrderSync {
    /// Catalog generation this order belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Update every captured view.
    pub fn apply(self) {
        for view in &self.views {
            view.lock()
                .unwrap_or_else(|e| {
                    warn!("Detail view lock poisoned, recovering: {}", e);
                    e.into_inner()
                })
                .sync_order_at(self.generation, &self.ordered);
        }
        debug!(
            generation = self.generation,
            views = self.views.len(),
            "Detail views resynchronized"
        );
    }
}
