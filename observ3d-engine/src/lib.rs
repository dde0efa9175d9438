//! Observ3d viewer engine.
//!
//! Camera and output switching for an interactive 3D viewer: activatable
//! cameras and outputs kept single-active by coordinators, a director that
//! composes the active output per frame, camera-to-camera flights, and a
//! Bevy plugin hosting it all.

pub mod config;
pub mod engine;
pub mod error;
pub mod rpc;

#[cfg(test)]
mod test_support;
