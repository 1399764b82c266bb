use alloc::string::String;

use crate::LoadStatus;

/// A lightweight snapshot of a loader's presentation-relevant state.
///
/// Useful for virtualized lists that reuse a slot: capture before
/// [`crate::LazyLoader::detach`], restore after the slot is re-attached for
/// the same item, so an already-resolved source is not re-deferred.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoaderState {
    pub effective_source: String,
    pub status: LoadStatus,
}
