//! The application context tying cameras, outputs and transitions together.

/// Output composition state: render size and clear flags.
pub mod compositor;

/// Generic single-active coordinator over a registry.
pub mod coordinator;

#[allow(clippy::module_inception)]
pub mod director;

/// Director events, observer requests and the observer list.
pub mod events;

pub use director::Director;
