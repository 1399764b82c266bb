use alloc::string::String;
use alloc::sync::Arc;

use crate::loader::LazyLoader;
use crate::{NodeId, ProximityConfig};

/// A callback fired when a loader state update occurs.
pub type OnChangeCallback = Arc<dyn Fn(&LazyLoader) + Send + Sync>;

/// A callback the loader hands to [`crate::ProximitySource::arm`] so the
/// embedding layer can route "near" deliveries back into
/// [`crate::LazyLoader::notify_near`].
///
/// The argument is the node the delivery is for. Typical implementations
/// enqueue it on the UI event loop; the callback handed to the source itself
/// takes no arguments.
pub type OnNearCallback = Arc<dyn Fn(NodeId) + Send + Sync>;

/// Configuration for [`crate::LazyLoader`].
///
/// Cheap to clone: callbacks are stored in `Arc`s so adapters can tweak a
/// field and rebuild options without reallocating closures.
#[derive(Clone)]
pub struct LoaderOptions {
    /// The real resource URL to swap in once the node nears the viewport.
    ///
    /// Defaults to `""`. Any value different from the current effective
    /// source arms a subscription; only equality suppresses one.
    pub source: String,

    /// Parameters forwarded to the proximity capability on each arming.
    pub proximity: ProximityConfig,

    /// Invoked when the proximity source reports the armed node near the
    /// viewport.
    pub on_near: Option<OnNearCallback>,

    /// Optional callback fired when the loader's state changes.
    pub on_change: Option<OnChangeCallback>,
}

impl LoaderOptions {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            proximity: ProximityConfig::default(),
            on_near: None,
            on_change: None,
        }
    }

    pub fn with_proximity(mut self, proximity: ProximityConfig) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn with_on_near(
        mut self,
        on_near: Option<impl Fn(NodeId) + Send + Sync + 'static>,
    ) -> Self {
        self.on_near = on_near.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&LazyLoader) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::new("")
    }
}

impl core::fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("source", &self.source)
            .field("proximity", &self.proximity)
            .finish_non_exhaustive()
    }
}
