//! A headless lazy-loading engine for viewport-deferred media.
//!
//! For the element-building layer (props, status classification, rendered
//! element descriptions), see the `lazymedia-adapter` crate.
//!
//! This crate focuses on the lifecycle logic needed to defer off-screen media
//! loads safely: arming a proximity observer per mounted node, swapping the
//! real source in exactly once when the node nears the viewport, tracking the
//! load/error outcome, and releasing every subscription on teardown.
//!
//! It is UI-agnostic. A GUI/DOM layer is expected to provide:
//! - an opaque handle per mounted node
//! - proximity deliveries (or no capability at all; loads then happen
//!   eagerly)
//! - load/error completion events for the rendered element
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod loader;
mod observer;
mod options;
#[cfg(feature = "std")]
mod registry;
mod state;
mod types;

#[cfg(all(test, feature = "std"))]
mod tests;

pub use loader::LazyLoader;
pub use observer::{ArmOutcome, ImmediateSource, NearCallback, ProximityConfig, ProximitySource};
pub use options::{LoaderOptions, OnChangeCallback, OnNearCallback};
#[cfg(feature = "std")]
pub use registry::ViewportRegistry;
pub use state::LoaderState;
pub use types::{LoadPhase, LoadStatus, NodeId, PLACEHOLDER_SOURCE};
