/// Opaque handle for a mounted node, assigned by the embedding UI layer.
///
/// The engine never interprets it; it only keys proximity subscriptions.
pub type NodeId = u64;

/// The fixed placeholder resource: a 1×1 transparent PNG data URI.
///
/// Rendered before the real source is swapped in, and declared as the visual
/// fallback when the real source fails to load.
pub const PLACEHOLDER_SOURCE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkqAcAAIUAgUW0RjgAAAAASUVORK5CYII=";

/// Terminal classification of the effective source's load outcome.
///
/// `Pending` until the platform reports completion for whatever is currently
/// rendered. A trigger that swaps the effective source resets it to
/// `Pending`; `Errored` is absorbing (a late success never downgrades it).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded,
    Errored,
}

impl LoadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The load controller's machine state.
///
/// `Placeholder` whenever the requested source differs from what is
/// rendered; once they agree, the load outcome decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadPhase {
    /// Waiting for a proximity signal; the placeholder (or a stale previous
    /// source) is still showing.
    Placeholder,
    /// The real source is set; outcome pending.
    Triggered,
    Loaded,
    Errored,
}
