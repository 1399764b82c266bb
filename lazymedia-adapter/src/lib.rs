//! Presentation adapter utilities for the `lazymedia` crate.
//!
//! The `lazymedia` crate is UI-agnostic and focuses on the load-controller
//! state machine. This crate provides the small, framework-neutral
//! presentation layer on top:
//!
//! - Per-slot props with documented defaults (alt text, class hook, subtype)
//! - The status → classification mapping (`loaded` / `has-error`)
//! - A generic controller building renderable element descriptions
//!
//! This crate is intentionally framework-agnostic (no DOM/GUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod element;


pub use controller::{LazyImage, LazyVideo, MediaController};
pub use element::{ElementKind, Image, MediaElement, MediaProps, Video, status_class};
