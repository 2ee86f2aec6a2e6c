//! Workspace placeholder crate.
//!
//! This crate exposes the shared feature flags that map to the individual
//! workspace crates (`core-service`, which wires every core crate).
//! Host applications can depend on `fleet-yard-workspace` and enable the
//! documented features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::{CoreError, CoreService};
