//! Camera-to-camera flight planning.
//!
//! A flight is either a direct interpolation or, when scene geometry blocks
//! the straight line, a climb-cruise-descend path at a fixed altitude.

/// Path choice, leg timing and pose sampling.
pub mod planner;

/// Scene queries for the occlusion heuristic.
pub mod raycast;
