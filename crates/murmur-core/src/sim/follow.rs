use glam::Vec3;

use crate::sim::flock::{Flock, FlockInitError};
use murmur_params::FlockConfig;

/// Which agent an external viewpoint is tracking, if any.
///
/// Starts inactive at index 0. Each `advance` activates following and moves
/// to the next agent, wrapping around the flock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowCamera {
    index: usize,
    active: bool,
}

impl FollowCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the next agent. No-op for an empty flock.
    pub fn advance(&mut self, agent_count: usize) {
        if agent_count == 0 {
            return;
        }
        self.active = true;
        self.index = (self.index + 1) % agent_count;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the followed agent while following is active.
    pub fn selected(&self) -> Option<usize> {
        self.active.then_some(self.index)
    }

    /// Current position of the followed agent.
    pub fn target(&self, flock: &Flock) -> Option<Vec3> {
        self.selected()
            .and_then(|i| flock.agent(i))
            .map(|agent| agent.position)
    }
}

/// Everything a frame driver owns: the flock plus viewpoint selection.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub flock: Flock,
    pub follow: FollowCamera,
}

impl SimulationState {
    pub fn new(config: &FlockConfig) -> Result<Self, FlockInitError> {
        Ok(Self {
            flock: Flock::new(config)?,
            follow: FollowCamera::new(),
        })
    }

    /// One display frame: advance the flock and report where the followed
    /// agent ended up.
    pub fn frame(&mut self) -> Option<Vec3> {
        self.flock.step();
        self.follow.target(&self.flock)
    }

    /// Interaction hook: cycle the followed agent.
    pub fn select_next(&mut self) {
        self.follow.advance(self.flock.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: u32) -> FlockConfig {
        let mut config = FlockConfig::default();
        config.agents.count = count;
        config
    }

    #[test]
    fn starts_inactive() {
        let camera = FollowCamera::new();
        assert!(!camera.is_active());
        assert_eq!(camera.selected(), None);
    }

    #[test]
    fn advance_wraps_around() {
        let mut camera = FollowCamera::new();
        camera.advance(3);
        assert_eq!(camera.selected(), Some(1));
        camera.advance(3);
        camera.advance(3);
        assert_eq!(camera.selected(), Some(0));
    }

    #[test]
    fn advance_on_empty_flock_does_nothing() {
        let mut camera = FollowCamera::new();
        camera.advance(0);
        assert!(!camera.is_active());
    }

    #[test]
    fn frame_reports_followed_position_after_step() {
        let mut state = SimulationState::new(&config(8)).unwrap();
        assert_eq!(state.frame(), None);

        state.select_next();
        let target = state.frame();
        assert_eq!(target, Some(state.flock.agents()[1].position));
    }

    #[test]
    fn deactivate_stops_following() {
        let mut state = SimulationState::new(&config(4)).unwrap();
        state.select_next();
        state.follow.deactivate();
        assert_eq!(state.follow.target(&state.flock), None);
    }
}
