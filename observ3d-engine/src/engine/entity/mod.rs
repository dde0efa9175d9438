//! Activatable entities and their registries.
//!
//! Cameras and outputs share one lifecycle model: a coordinator owns the
//! registry and is the only place activation state changes.

/// Lifecycle state, phases and the `Activatable` trait.
pub mod lifecycle;

/// Ordered, id-indexed entity storage.
pub mod registry;
