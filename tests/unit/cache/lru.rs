use super::*;
use crate::foundation::core::rect;

fn small_cache() -> ResultCache<u32> {
    ResultCache::new(CacheConfig {
        capacity: 3,
        stale_after_ms: 5000,
    })
}

#[test]
fn get_after_set_returns_the_value() {
    let mut cache = small_cache();
    cache.set("a", 1, 0);
    assert_eq!(cache.get("a", 0), Some(&1));
    assert_eq!(cache.get("missing", 0), None);
}

#[test]
fn entries_expire_after_the_staleness_window() {
    let mut cache = small_cache();
    cache.set("a", 1, 1000);
    assert_eq!(cache.get("a", 5999), Some(&1));
    // Exactly at the window boundary the entry is stale.
    assert_eq!(cache.get("a", 6000), None);
    // The stale entry was physically evicted, not just hidden.
    assert_eq!(cache.len(), 0);
}

#[test]
fn eviction_is_least_recently_accessed_not_least_recently_inserted() {
    let mut cache = small_cache();
    cache.set("a", 1, 0);
    cache.set("b", 2, 1);
    cache.set("c", 3, 2);
    // Touch the oldest-inserted entry so "b" becomes the LRU.
    assert_eq!(cache.get("a", 3), Some(&1));
    cache.set("d", 4, 4);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("b", 5), None);
    assert_eq!(cache.get("a", 5), Some(&1));
    assert_eq!(cache.get("c", 5), Some(&3));
    assert_eq!(cache.get("d", 5), Some(&4));
}

#[test]
fn set_refreshes_both_value_and_timestamp() {
    let mut cache = small_cache();
    cache.set("a", 1, 0);
    cache.set("a", 2, 4000);
    assert_eq!(cache.get("a", 8000), Some(&2));
    assert_eq!(cache.len(), 1);
}

#[test]
fn clear_is_idempotent() {
    let mut cache = small_cache();
    cache.set("a", 1, 0);
    cache.clear();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.get("a", 0), None);
}

#[test]
fn remove_returns_the_stored_value() {
    let mut cache = small_cache();
    cache.set("a", 7, 0);
    assert_eq!(cache.remove("a"), Some(7));
    assert_eq!(cache.remove("a"), None);
}

#[test]
fn cache_key_covers_every_input() {
    let bounds = rect(0.0, 0.0, 920.0, 600.0);
    let base = cache_key(
        "gallery",
        bounds,
        Breakpoint::Desktop,
        Orientation::Landscape,
        &("opts", 1),
    );
    assert_ne!(
        base,
        cache_key(
            "other",
            bounds,
            Breakpoint::Desktop,
            Orientation::Landscape,
            &("opts", 1),
        )
    );
    assert_ne!(
        base,
        cache_key(
            "gallery",
            rect(0.0, 0.0, 921.0, 600.0),
            Breakpoint::Desktop,
            Orientation::Landscape,
            &("opts", 1),
        )
    );
    assert_ne!(
        base,
        cache_key(
            "gallery",
            bounds,
            Breakpoint::Tablet,
            Orientation::Landscape,
            &("opts", 1),
        )
    );
    assert_ne!(
        base,
        cache_key(
            "gallery",
            bounds,
            Breakpoint::Desktop,
            Orientation::Portrait,
            &("opts", 1),
        )
    );
    // Any option byte changes the key.
    assert_ne!(
        base,
        cache_key(
            "gallery",
            bounds,
            Breakpoint::Desktop,
            Orientation::Landscape,
            &("opts", 2),
        )
    );
}

#[test]
fn cache_key_rounds_subpixel_bounds() {
    let a = cache_key(
        "g",
        rect(0.0, 0.0, 920.2, 600.0),
        Breakpoint::Desktop,
        Orientation::Landscape,
        &(),
    );
    let b = cache_key(
        "g",
        rect(0.0, 0.0, 919.8, 600.0),
        Breakpoint::Desktop,
        Orientation::Landscape,
        &(),
    );
    assert_eq!(a, b);
}
