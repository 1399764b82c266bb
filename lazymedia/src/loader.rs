use alloc::string::String;
use alloc::sync::Arc;
use core::cell::Cell;

use crate::{
    ArmOutcome, ImmediateSource, LoadPhase, LoadStatus, LoaderOptions, LoaderState, NearCallback,
    NodeId, PLACEHOLDER_SOURCE, ProximitySource,
};

/// A per-element lazy-load controller.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects; the mounted node is an opaque handle.
/// - Your adapter drives it by forwarding lifecycle changes
///   ([`attach`]/[`detach`]/[`set_source`]) and platform events
///   ([`notify_near`]/[`notify_load`]/[`notify_error`]).
/// - Rendering reads [`effective_source`] and [`status`].
///
/// The loader owns at most one proximity subscription at a time: one exists
/// exactly while a node is attached and the effective source still differs
/// from the requested one. The subscription is released synchronously on its
/// single firing, on teardown, and whenever the requested source changes.
///
/// For the element-building layer (props, classification, rendered element
/// descriptions), see the `lazymedia-adapter` crate.
///
/// [`attach`]: LazyLoader::attach
/// [`detach`]: LazyLoader::detach
/// [`set_source`]: LazyLoader::set_source
/// [`notify_near`]: LazyLoader::notify_near
/// [`notify_load`]: LazyLoader::notify_load
/// [`notify_error`]: LazyLoader::notify_error
/// [`effective_source`]: LazyLoader::effective_source
/// [`status`]: LazyLoader::status
pub struct LazyLoader {
    options: LoaderOptions,
    observer: Arc<dyn ProximitySource>,

    effective: String,
    status: LoadStatus,
    node: Option<NodeId>,
    armed: bool,
    // Set by `detach`; every deferred platform callback is checked against
    // this before it may mutate state.
    cancelled: bool,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl LazyLoader {
    /// Creates a loader with no proximity capability.
    ///
    /// Arming then resolves immediately ([`ArmOutcome::Near`]), so the real
    /// source is swapped in as soon as a node is attached, the old-runtime
    /// fallback. Inject a real capability with [`Self::with_observer`].
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_observer(options, Arc::new(ImmediateSource))
    }

    /// Creates a loader observing through the given proximity capability.
    pub fn with_observer(options: LoaderOptions, observer: Arc<dyn ProximitySource>) -> Self {
        ldebug!("LazyLoader::new");
        Self {
            options,
            observer,
            effective: String::from(PLACEHOLDER_SOURCE),
            status: LoadStatus::Pending,
            node: None,
            armed: false,
            cancelled: false,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// The caller-requested source.
    pub fn requested_source(&self) -> &str {
        &self.options.source
    }

    /// What should currently be rendered: the placeholder until a proximity
    /// signal fires, the requested source afterwards.
    pub fn effective_source(&self) -> &str {
        &self.effective
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn phase(&self) -> LoadPhase {
        if self.effective != self.options.source {
            LoadPhase::Placeholder
        } else {
            match self.status {
                LoadStatus::Pending => LoadPhase::Triggered,
                LoadStatus::Loaded => LoadPhase::Loaded,
                LoadStatus::Errored => LoadPhase::Errored,
            }
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Whether a proximity subscription is currently live.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&LazyLoader) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_on_near(&mut self, on_near: Option<impl Fn(NodeId) + Send + Sync + 'static>) {
        self.options.on_near = on_near.map(|f| Arc::new(f) as _);
    }

    /// Mounts the rendered node and arms observation when needed.
    ///
    /// Re-attaching under a different node first releases the subscription
    /// keyed by the old handle. Clears the teardown flag, so a detached
    /// loader can be brought back for a reused slot.
    pub fn attach(&mut self, node: NodeId) {
        ldebug!(node, "LazyLoader::attach");
        self.batch_update(|l| {
            if l.node != Some(node) {
                l.release_subscription();
            }
            l.node = Some(node);
            l.cancelled = false;
            l.evaluate_arm();
        });
    }

    /// Tears the instance down: releases any live subscription, forgets the
    /// node, and blocks every queued platform callback from mutating state.
    ///
    /// Safe in every machine state; safe to call repeatedly.
    pub fn detach(&mut self) {
        ldebug!("LazyLoader::detach");
        self.batch_update(|l| {
            l.cancelled = true;
            l.release_subscription();
            l.node = None;
        });
    }

    /// Delivers a proximity notification for `node`.
    ///
    /// Call this when the platform reports the armed node near the viewport
    /// (typically from the event your `on_near` callback enqueued). The
    /// delivery is checked against the teardown flag, the attached node, and
    /// the live-subscription flag, so a notification queued before a
    /// teardown or re-arm is rejected here rather than applied stale.
    ///
    /// Effect: the requested source becomes effective, the load outcome
    /// resets to [`LoadStatus::Pending`], and the subscription is released;
    /// a given arming can never trigger twice.
    pub fn notify_near(&mut self, node: NodeId) {
        if self.cancelled || self.node != Some(node) || !self.armed {
            return;
        }
        ltrace!(node, "LazyLoader::notify_near");
        self.batch_update(|l| {
            l.release_subscription();
            l.apply_trigger();
        });
    }

    /// Records a successful load report for the current effective source.
    ///
    /// Ignored after teardown and once a terminal outcome is recorded (a
    /// late success never downgrades an error).
    pub fn notify_load(&mut self) {
        if self.cancelled || self.status != LoadStatus::Pending {
            return;
        }
        ltrace!("LazyLoader::notify_load");
        self.status = LoadStatus::Loaded;
        self.notify();
    }

    /// Records a load failure for the current effective source.
    ///
    /// The effective source is not reverted and nothing is retried; the
    /// fallback visual is a presentation concern keyed off the errored
    /// classification. Overrides an earlier success (error precedence).
    pub fn notify_error(&mut self) {
        if self.cancelled || self.status == LoadStatus::Errored {
            return;
        }
        lwarn!("resource load failure");
        self.status = LoadStatus::Errored;
        self.notify();
    }

    /// Replaces the requested source.
    ///
    /// Any live subscription is torn down first, then arm conditions are
    /// re-evaluated against the new value, so a reused slot never keeps a
    /// subscription pointing at an obsolete target.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if self.options.source == source {
            return;
        }
        ldebug!("LazyLoader::set_source");
        self.batch_update(|l| {
            l.release_subscription();
            l.options.source = source;
            l.notify();
            l.evaluate_arm();
        });
    }

    /// Returns a snapshot of the presentation-relevant state.
    pub fn state(&self) -> LoaderState {
        LoaderState {
            effective_source: self.effective.clone(),
            status: self.status,
        }
    }

    /// Restores a previously captured snapshot.
    ///
    /// Any live subscription is released first; arm conditions are then
    /// re-evaluated against the restored effective source, so a slot whose
    /// snapshot had already resolved its source does not re-arm.
    pub fn restore_state(&mut self, state: LoaderState) {
        ldebug!("LazyLoader::restore_state");
        self.batch_update(|l| {
            l.release_subscription();
            l.effective = state.effective_source;
            l.status = state.status;
            l.notify();
            l.evaluate_arm();
        });
    }

    fn evaluate_arm(&mut self) {
        let Some(node) = self.node else {
            return;
        };
        if self.armed || self.cancelled {
            return;
        }
        if self.effective == self.options.source {
            // Nothing to swap in; arming would leak a subscription that can
            // never usefully fire.
            return;
        }

        let on_near = self.options.on_near.clone();
        let callback: NearCallback = Arc::new(move || {
            if let Some(cb) = &on_near {
                cb(node);
            }
        });

        match self.observer.arm(node, &self.options.proximity, callback) {
            ArmOutcome::Armed => {
                ltrace!(node, "proximity subscription armed");
                self.armed = true;
                self.notify();
            }
            ArmOutcome::Near => {
                // Capability absent: load right away instead of deferring.
                ltrace!(node, "proximity capability absent, loading immediately");
                self.apply_trigger();
            }
        }
    }

    fn apply_trigger(&mut self) {
        self.effective = self.options.source.clone();
        self.status = LoadStatus::Pending;
        self.notify();
    }

    fn release_subscription(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(node) = self.node {
            self.observer.disarm(node);
        }
        self.armed = false;
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// The compound lifecycle operations (`attach`, `set_source`, …) already
    /// batch internally; use this when your adapter applies several of them
    /// per frame and the callback drives rendering.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }
}

impl core::fmt::Debug for LazyLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LazyLoader")
            .field("options", &self.options)
            .field("effective", &self.effective)
            .field("status", &self.status)
            .field("node", &self.node)
            .field("armed", &self.armed)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}
