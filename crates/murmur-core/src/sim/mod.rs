pub mod agents;
pub mod flock;
pub mod follow;
pub mod math;
pub mod steering;

pub use agents::*;
pub use flock::*;
pub use follow::*;
pub use steering::*;
