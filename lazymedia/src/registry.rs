use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ArmOutcome, NearCallback, NodeId, ProximityConfig, ProximitySource};

struct ArmedEntry {
    on_near: NearCallback,
    config: ProximityConfig,
}

#[derive(Default)]
struct RegistryInner {
    armed: HashMap<NodeId, ArmedEntry>,
    extents: HashMap<NodeId, (u64, u32)>,
    viewport_offset: u64,
    viewport_size: u32,
}

/// A shared viewport-observation registry.
///
/// This is the reference [`ProximitySource`] for embeddings where the adapter
/// owns scroll state (TUI panes, canvas surfaces, simulations) and the mock
/// of choice in tests. Clones share the same underlying table, mirroring how
/// a platform exposes one process-wide observation capability.
///
/// The registry tracks one entry per armed node. An entry fires at most once
/// per arming and is removed *before* its callback runs, so a "near"
/// notification can never be delivered for a node that was already disarmed.
/// Arming never evaluates geometry synchronously; the node is considered on
/// the next [`pump`]/[`set_viewport`] (the platform's own event delivery).
///
/// [`pump`]: ViewportRegistry::pump
/// [`set_viewport`]: ViewportRegistry::set_viewport
#[derive(Clone, Default)]
pub struct ViewportRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the extent of a node along the scroll axis.
    pub fn set_node_extent(&self, node: NodeId, start: u64, size: u32) {
        self.lock().extents.insert(node, (start, size));
    }

    /// Forgets a node's extent (e.g. after unmount).
    pub fn clear_node_extent(&self, node: NodeId) {
        self.lock().extents.remove(&node);
    }

    /// Updates viewport geometry and evaluates armed nodes against it.
    ///
    /// Returns how many "near" callbacks fired.
    pub fn set_viewport(&self, offset: u64, size: u32) -> usize {
        {
            let mut inner = self.lock();
            inner.viewport_offset = offset;
            inner.viewport_size = size;
        }
        self.pump()
    }

    /// Evaluates the current geometry and fires the callbacks of armed nodes
    /// inside their look-ahead window.
    ///
    /// Returns how many callbacks fired. Callbacks run after the registry
    /// lock is released, so they may re-enter (e.g. to disarm).
    pub fn pump(&self) -> usize {
        let fired: Vec<NearCallback> = {
            let mut inner = self.lock();
            let offset = inner.viewport_offset;
            let size = inner.viewport_size;
            let near: Vec<NodeId> = inner
                .armed
                .iter()
                .filter(|(node, entry)| {
                    inner.extents.get(*node).is_some_and(|&(start, len)| {
                        in_window(&entry.config, offset, size, start, len)
                    })
                })
                .map(|(&node, _)| node)
                .collect();
            near.into_iter()
                .filter_map(|node| inner.armed.remove(&node))
                .map(|entry| entry.on_near)
                .collect()
        };
        ltrace!(fired = fired.len(), "ViewportRegistry::pump");
        for on_near in &fired {
            on_near();
        }
        fired.len()
    }

    /// Delivers an explicit intersection report for `node`.
    ///
    /// Fires iff the node is armed and the report satisfies the trigger
    /// condition: any positive ratio, or the intersecting flag (the two are
    /// equivalent). Returns whether the callback fired; a non-qualifying
    /// report leaves the node armed.
    pub fn deliver(&self, node: NodeId, ratio: f32, is_intersecting: bool) -> bool {
        if !(is_intersecting || ratio > 0.0) {
            return false;
        }
        let entry = self.lock().armed.remove(&node);
        match entry {
            Some(entry) => {
                ltrace!(node, "ViewportRegistry::deliver");
                (entry.on_near)();
                true
            }
            None => false,
        }
    }

    /// Number of live subscriptions.
    pub fn armed_len(&self) -> usize {
        self.lock().armed.len()
    }

    pub fn is_armed(&self, node: NodeId) -> bool {
        self.lock().armed.contains_key(&node)
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProximitySource for ViewportRegistry {
    fn arm(&self, node: NodeId, config: &ProximityConfig, on_near: NearCallback) -> ArmOutcome {
        ltrace!(node, "ViewportRegistry::arm");
        // Re-arming a node replaces its entry; each instance owns exactly
        // one subscription keyed by its node.
        self.lock().armed.insert(
            node,
            ArmedEntry {
                on_near,
                config: *config,
            },
        );
        ArmOutcome::Armed
    }

    fn disarm(&self, node: NodeId) {
        // Idempotent: removing an absent entry is fine.
        self.lock().armed.remove(&node);
    }
}

fn in_window(
    config: &ProximityConfig,
    viewport_offset: u64,
    viewport_size: u32,
    start: u64,
    len: u32,
) -> bool {
    let look_ahead = (viewport_size as f32 * config.look_ahead_fraction) as u64;
    let win_start = viewport_offset.saturating_sub(look_ahead);
    let win_end = viewport_offset
        .saturating_add(viewport_size as u64)
        .saturating_add(look_ahead);
    if len == 0 {
        // Zero-sized nodes report "intersecting" with a zero ratio when they
        // sit inside the window.
        start >= win_start && start <= win_end
    } else {
        let end = start.saturating_add(len as u64);
        start < win_end && end > win_start
    }
}
