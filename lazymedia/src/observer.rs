use alloc::sync::Arc;

use crate::NodeId;

/// A callback fired when an armed node comes near the visible viewport.
pub type NearCallback = Arc<dyn Fn() + Send + Sync>;

/// Result of arming a node on a [`ProximitySource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmOutcome {
    /// Observation began; the callback fires later through the source's own
    /// event delivery.
    Armed,
    /// The platform capability is unavailable. The caller must treat the
    /// proximity condition as already satisfied and proceed without it.
    Near,
}

/// Observation parameters handed to the platform capability per arming.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityConfig {
    /// Look-ahead margin on both sides of the viewport, as a fraction of the
    /// viewport size along the scroll axis.
    pub look_ahead_fraction: f32,
    /// Minimal intersection ratio forwarded to external platform
    /// implementations that take a threshold at registration time.
    ///
    /// The reference [`crate::ViewportRegistry`] does not consult it: any
    /// ratio above zero triggers, as does a boolean "is intersecting" report
    /// with a zero ratio (zero-sized nodes produce exactly that).
    pub min_ratio: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            look_ahead_fraction: 0.75,
            min_ratio: 0.01,
        }
    }
}

/// A source of viewport-proximity signals.
///
/// Implementations observe a mounted node and fire `on_near` at most once per
/// arming, through their own event delivery, never from inside [`arm`]
/// itself. Disarming takes effect before the call returns; a notification can
/// still have been queued by the embedding layer before that, which is why
/// consumers re-check liveness at delivery time.
///
/// This component never raises: the only non-success condition is capability
/// absence, reported through [`ArmOutcome::Near`].
///
/// [`arm`]: ProximitySource::arm
pub trait ProximitySource: Send + Sync {
    /// Begins observing `node` with the given parameters.
    ///
    /// Returns [`ArmOutcome::Armed`] when observation began. When the
    /// capability is unavailable, returns [`ArmOutcome::Near`] without
    /// retaining `on_near`.
    fn arm(&self, node: NodeId, config: &ProximityConfig, on_near: NearCallback) -> ArmOutcome;

    /// Ceases observing `node` and releases the resources tied to it.
    ///
    /// Idempotent: safe for nodes that were never armed or were already
    /// disarmed.
    fn disarm(&self, node: NodeId);
}

/// The capability-absent fallback source.
///
/// Always reports [`ArmOutcome::Near`], so callers load the real resource
/// right away instead of deferring it: the visibility optimization is lost,
/// the content is not.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateSource;

impl ProximitySource for ImmediateSource {
    fn arm(&self, _node: NodeId, _config: &ProximityConfig, _on_near: NearCallback) -> ArmOutcome {
        ArmOutcome::Near
    }

    fn disarm(&self, _node: NodeId) {}
}
