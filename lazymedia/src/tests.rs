use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type NearQueue = Arc<Mutex<Vec<NodeId>>>;

fn queue() -> NearQueue {
    Arc::new(Mutex::new(Vec::new()))
}

fn queued_options(source: &str, queue: &NearQueue) -> LoaderOptions {
    let queue = Arc::clone(queue);
    LoaderOptions::new(source).with_on_near(Some(move |node: NodeId| {
        queue.lock().unwrap().push(node);
    }))
}

fn drain(loader: &mut LazyLoader, queue: &NearQueue) {
    let nodes: Vec<NodeId> = queue.lock().unwrap().drain(..).collect();
    for node in nodes {
        loader.notify_near(node);
    }
}

fn registry_loader(source: &str) -> (ViewportRegistry, NearQueue, LazyLoader) {
    let registry = ViewportRegistry::new();
    let queue = queue();
    let loader = LazyLoader::with_observer(
        queued_options(source, &queue),
        Arc::new(registry.clone()),
    );
    (registry, queue, loader)
}

#[test]
fn placeholder_first() {
    let (registry, _queue, mut loader) = registry_loader("photo.jpg");
    assert_eq!(loader.effective_source(), PLACEHOLDER_SOURCE);
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert_eq!(loader.phase(), LoadPhase::Placeholder);
    assert!(!loader.is_armed());

    loader.attach(7);
    // Mounted, but no proximity signal yet: still the placeholder.
    assert_eq!(loader.effective_source(), PLACEHOLDER_SOURCE);
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert!(loader.is_armed());
    assert_eq!(registry.armed_len(), 1);
    assert!(registry.is_armed(7));
}

#[test]
fn far_node_never_triggers() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    registry.set_node_extent(1, 10_000, 20);

    // Viewport 0..100 with a 75% look-ahead reaches offset 175 at most.
    for offset in [0, 40, 80] {
        assert_eq!(registry.set_viewport(offset, 100), 0);
    }
    drain(&mut loader, &queue);

    assert_eq!(loader.effective_source(), PLACEHOLDER_SOURCE);
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert!(loader.is_armed());
}

#[test]
fn near_then_load() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);

    assert!(registry.deliver(1, 0.4, true));
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "photo.jpg");
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert_eq!(loader.phase(), LoadPhase::Triggered);
    // Subscription released on the single firing.
    assert!(!loader.is_armed());
    assert_eq!(registry.armed_len(), 0);

    loader.notify_load();
    assert_eq!(loader.status(), LoadStatus::Loaded);
    assert_eq!(loader.phase(), LoadPhase::Loaded);
}

#[test]
fn near_then_error_keeps_source() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);

    loader.notify_error();
    assert_eq!(loader.status(), LoadStatus::Errored);
    assert_eq!(loader.phase(), LoadPhase::Errored);
    // The source value is not reverted; the fallback visual is presentation.
    assert_eq!(loader.effective_source(), "photo.jpg");
}

#[test]
fn at_most_one_trigger_per_source() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    let changes = Arc::new(AtomicUsize::new(0));
    {
        let changes = Arc::clone(&changes);
        loader.set_on_change(Some(move |_: &LazyLoader| {
            changes.fetch_add(1, Ordering::Relaxed);
        }));
    }
    loader.attach(1);
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    let after_trigger = changes.load(Ordering::Relaxed);

    // A duplicate delivery for the same node must be a no-op.
    assert!(!registry.deliver(1, 1.0, true));
    loader.notify_near(1);
    assert_eq!(changes.load(Ordering::Relaxed), after_trigger);
    assert_eq!(loader.effective_source(), "photo.jpg");
}

#[test]
fn no_subscription_when_requested_equals_placeholder() {
    let (registry, _queue, mut loader) = registry_loader(PLACEHOLDER_SOURCE);
    loader.attach(1);
    assert!(!loader.is_armed());
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn capability_absent_loads_immediately() {
    // `new` uses the capability-absent fallback source.
    let mut loader = LazyLoader::new(LoaderOptions::new("photo.jpg"));
    loader.attach(1);
    // No external event needed.
    assert_eq!(loader.effective_source(), "photo.jpg");
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert!(!loader.is_armed());
}

#[test]
fn teardown_rejects_queued_near_delivery() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);

    // The platform fires, the event sits in the queue...
    assert!(registry.deliver(1, 1.0, true));
    assert_eq!(queue.lock().unwrap().len(), 1);

    // ...and the instance unmounts before the queue is drained.
    loader.detach();
    drain(&mut loader, &queue);

    assert_eq!(loader.effective_source(), PLACEHOLDER_SOURCE);
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn teardown_rejects_late_load_outcome() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "photo.jpg");

    // Unmount lands before the load/error callback arrives.
    loader.detach();
    loader.notify_load();
    assert_eq!(loader.status(), LoadStatus::Pending);
    loader.notify_error();
    assert_eq!(loader.status(), LoadStatus::Pending);
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn source_change_arms_fresh_subscription() {
    let (registry, queue, mut loader) = registry_loader("a.jpg");
    loader.attach(1);
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    loader.notify_load();
    assert_eq!(loader.effective_source(), "a.jpg");
    assert_eq!(loader.status(), LoadStatus::Loaded);

    // Slot reuse: same instance, new target.
    loader.set_source("b.jpg");
    assert_eq!(loader.phase(), LoadPhase::Placeholder);
    assert!(loader.is_armed());
    assert_eq!(registry.armed_len(), 1);
    // The previous outcome stays attached to what is still rendered.
    assert_eq!(loader.effective_source(), "a.jpg");
    assert_eq!(loader.status(), LoadStatus::Loaded);

    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "b.jpg");
    assert_eq!(loader.status(), LoadStatus::Pending);
    loader.notify_load();
    assert_eq!(loader.status(), LoadStatus::Loaded);
}

#[test]
fn source_change_while_armed_replaces_subscription() {
    let (registry, queue, mut loader) = registry_loader("a.jpg");
    loader.attach(1);
    assert_eq!(registry.armed_len(), 1);

    loader.set_source("b.jpg");
    // Exactly one live entry; the stale one was torn down first.
    assert_eq!(registry.armed_len(), 1);

    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "b.jpg");
}

#[test]
fn source_change_to_effective_releases_subscription() {
    let (registry, _queue, mut loader) = registry_loader("a.jpg");
    loader.attach(1);
    assert!(loader.is_armed());

    // Requested now equals what is rendered: nothing left to swap in.
    loader.set_source(PLACEHOLDER_SOURCE);
    assert!(!loader.is_armed());
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn empty_requested_source_still_swaps() {
    let mut loader = LazyLoader::new(LoaderOptions::default());
    loader.attach(1);
    // "" differs from the placeholder, so the swap happens like any other.
    assert_eq!(loader.effective_source(), "");
}

#[test]
fn detach_then_reattach_rearms() {
    let (registry, _queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    loader.detach();
    assert_eq!(registry.armed_len(), 0);

    loader.attach(2);
    assert!(loader.is_armed());
    assert!(registry.is_armed(2));
}

#[test]
fn disarm_is_idempotent() {
    let (registry, _queue, mut loader) = registry_loader("photo.jpg");
    registry.disarm(42);
    assert_eq!(registry.armed_len(), 0);

    loader.attach(1);
    registry.disarm(1);
    registry.disarm(1);
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn threshold_ratio_and_flag_are_equivalent() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);

    // Neither condition holds: stays armed.
    assert!(!registry.deliver(1, 0.0, false));
    assert!(registry.is_armed(1));

    // Intersecting flag alone is enough (zero ratio).
    assert!(registry.deliver(1, 0.0, true));
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "photo.jpg");

    // Positive ratio alone is enough too.
    loader.set_source("other.jpg");
    assert!(registry.is_armed(1));
    assert!(registry.deliver(1, 0.2, false));
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "other.jpg");
}

#[test]
fn geometric_look_ahead_window() {
    let registry = ViewportRegistry::new();
    let queue = queue();
    let mut near =
        LazyLoader::with_observer(queued_options("near.jpg", &queue), Arc::new(registry.clone()));
    let mut far =
        LazyLoader::with_observer(queued_options("far.jpg", &queue), Arc::new(registry.clone()));
    near.attach(1);
    far.attach(2);

    // Viewport 0..100 plus the default 75% margin reaches offset 175.
    registry.set_node_extent(1, 150, 10);
    registry.set_node_extent(2, 200, 10);
    assert_eq!(registry.set_viewport(0, 100), 1);
    drain(&mut near, &queue);
    drain(&mut far, &queue);

    assert_eq!(near.effective_source(), "near.jpg");
    assert_eq!(far.effective_source(), PLACEHOLDER_SOURCE);
    assert!(far.is_armed());

    // Scrolling forward brings the far node inside the window.
    assert_eq!(registry.set_viewport(30, 100), 1);
    drain(&mut far, &queue);
    assert_eq!(far.effective_source(), "far.jpg");
    assert_eq!(registry.armed_len(), 0);
}

#[test]
fn look_ahead_applies_behind_the_viewport() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    registry.set_node_extent(1, 930, 10);

    // Scrolled past the node: viewport 1000..1100 with a 75% look-ahead
    // keeps a trailing window down to offset 925, which still covers it.
    assert_eq!(registry.set_viewport(1000, 100), 1);
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "photo.jpg");
}

#[test]
fn zero_sized_node_counts_as_intersecting() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    loader.attach(1);
    registry.set_node_extent(1, 50, 0);

    assert_eq!(registry.set_viewport(0, 100), 1);
    drain(&mut loader, &queue);
    assert_eq!(loader.effective_source(), "photo.jpg");
}

#[test]
fn on_change_fires_once_per_batched_operation() {
    let (registry, queue, mut loader) = registry_loader("photo.jpg");
    let changes = Arc::new(AtomicUsize::new(0));
    {
        let changes = Arc::clone(&changes);
        loader.set_on_change(Some(move |_: &LazyLoader| {
            changes.fetch_add(1, Ordering::Relaxed);
        }));
    }
    let base = changes.load(Ordering::Relaxed);

    // attach: node recorded + subscription armed, one notification.
    loader.attach(1);
    assert_eq!(changes.load(Ordering::Relaxed), base + 1);

    // trigger: release + swap, one notification.
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    assert_eq!(changes.load(Ordering::Relaxed), base + 2);

    // Explicit batches coalesce too.
    loader.batch_update(|l| {
        l.set_source("x.jpg");
        l.set_source("y.jpg");
    });
    assert_eq!(changes.load(Ordering::Relaxed), base + 3);
}

#[test]
fn error_precedence_over_late_success() {
    let mut loader = LazyLoader::new(LoaderOptions::new("photo.jpg"));
    loader.attach(1);

    loader.notify_load();
    assert_eq!(loader.status(), LoadStatus::Loaded);

    // A failure report wins over the earlier success...
    loader.notify_error();
    assert_eq!(loader.status(), LoadStatus::Errored);
    assert!(loader.status().is_terminal());

    // ...and a success after a failure is ignored.
    loader.notify_load();
    assert_eq!(loader.status(), LoadStatus::Errored);
}

#[test]
fn snapshot_restore_skips_rearming_resolved_slot() {
    let (registry, queue, mut loader) = registry_loader("a.jpg");
    loader.attach(1);
    registry.deliver(1, 1.0, true);
    drain(&mut loader, &queue);
    loader.notify_load();

    let snapshot = loader.state();
    assert_eq!(snapshot.effective_source, "a.jpg");
    assert_eq!(snapshot.status, LoadStatus::Loaded);
    loader.detach();

    // A fresh loader for the same item arms again...
    let (registry2, _queue2, mut revived) = registry_loader("a.jpg");
    revived.attach(5);
    assert!(revived.is_armed());

    // ...until the snapshot tells it the source already resolved.
    revived.restore_state(snapshot);
    assert_eq!(revived.effective_source(), "a.jpg");
    assert_eq!(revived.status(), LoadStatus::Loaded);
    assert!(!revived.is_armed());
    assert_eq!(registry2.armed_len(), 0);
}

#[test]
fn requested_source_accessor_tracks_options() {
    let mut loader = LazyLoader::new(LoaderOptions::new("a.jpg"));
    assert_eq!(loader.requested_source(), "a.jpg");
    loader.set_source("b.jpg");
    assert_eq!(loader.requested_source(), "b.jpg");
    assert_eq!(loader.options().source, "b.jpg");
}
