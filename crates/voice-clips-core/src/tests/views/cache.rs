use crate::{DerivedViewCache, FileRef, RecordingDetail};

use std::sync::Arc;

use uuid::Uuid;

/// WHAT: The builder runs once per id
/// WHY: Reopening a recording reuses its view state
#[test]
fn given_cached_view_when_requesting_again_then_builder_not_called() {
    // Given: A cache with a view for one id
    let mut cache = DerivedViewCache::new();
    let id = Uuid::new_v4();
    let first = cache.get_or_insert_with(id, || {
        RecordingDetail::new(id, FileRef::new("/r/a.wav"), vec![id])
    });

    // When: Requesting again with a builder that must not run
    let second = cache.get_or_insert_with(id, || panic!("builder called twice"));

    // Then: Same shared instance
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

/// WHAT: Invalidation evicts only the named view
/// WHY: Renaming one recording must not discard other views
#[test]
fn given_two_views_when_invalidating_one_then_other_kept() {
    let mut cache = DerivedViewCache::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    for id in [a, b] {
        cache.get_or_insert_with(id, || {
            RecordingDetail::new(id, FileRef::new("/r/x.wav"), vec![a, b])
        });
    }

    assert!(cache.invalidate(a));
    assert!(!cache.invalidate(a));

    assert!(!cache.contains(a));
    assert!(cache.get(b).is_some());
    assert!(!cache.is_empty());
}

/// WHAT: An order sync reaches every view cached when it was taken
/// WHY: Navigation must follow the current catalog order
#[test]
fn given_cached_views_when_applying_order_sync_then_each_view_updated() {
    // Given: Two cached views on a one-entry order
    let mut cache = DerivedViewCache::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let views: Vec<_> = [a, b]
        .into_iter()
        .map(|id| {
            cache.get_or_insert_with(id, || {
                RecordingDetail::new(id, FileRef::new("/r/x.wav"), vec![id])
            })
        })
        .collect();

    // When: Applying a two-entry order
    cache.order_sync(1, vec![b, a]).apply();

    // Then: Each view is positioned on its own recording
    assert_eq!(views[0].lock().unwrap().current_index(), 1);
    assert_eq!(views[1].lock().unwrap().current_index(), 0);
}

/// WHAT: A sync older than the view's order is ignored
/// WHY: Late syncs must not roll navigation back
#[test]
fn given_newer_view_when_applying_older_sync_then_order_kept() {
    let mut cache = DerivedViewCache::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let view = cache.get_or_insert_with(a, || {
        RecordingDetail::new(a, FileRef::new("/r/a.wav"), vec![b, a])
    });

    cache.order_sync(3, vec![b, a]).apply();
    cache.order_sync(2, vec![a]).apply();

    let detail = view.lock().unwrap();
    assert_eq!(detail.current_index(), 1);
    assert_eq!(detail.current(), Some(a));
}
