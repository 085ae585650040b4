//! Murmur Core Engine
//!
//! Flocking simulation core: agents, the three steering rules and a two-phase
//! integrator driven one `step()` per frame.

pub mod sim;

// Re-export main types
pub use sim::*;

// Re-export params from murmur-params
pub use murmur_params::*;

pub use glam;
