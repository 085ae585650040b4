use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use rand::Rng;

use crate::sim::math;
use murmur_params::{AgentConfig, SpawnConfig};

/// A single flocking agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3, // Only meaningful between the force and integrate phases
    pub max_speed: f32,
    pub max_force: f32,
}

impl Agent {
    pub fn new(position: Vec3, velocity: Vec3, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_speed,
            max_force,
        }
    }

    /// Sample a fresh agent: position uniform in the spawn cube, velocity uniform
    /// in the velocity cube and divided by the configured divisor.
    pub fn spawn<R: Rng>(rng: &mut R, agents: &AgentConfig, spawn: &SpawnConfig) -> Self {
        let p = spawn.position_extent;
        let v = spawn.velocity_extent;

        let position = Vec3::new(
            rng.gen_range(-p..=p),
            rng.gen_range(-p..=p),
            rng.gen_range(-p..=p),
        );
        let velocity = Vec3::new(
            rng.gen_range(-v..=v),
            rng.gen_range(-v..=v),
            rng.gen_range(-v..=v),
        ) / spawn.velocity_divisor;

        Self::new(position, velocity, agents.max_speed, agents.max_force)
    }

    /// Apply the accumulated acceleration, move, then clear the accumulator.
    ///
    /// Velocity is not re-clamped to `max_speed`; only the steering
    /// corrections are bounded.
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec3::ZERO;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            target: self.position + self.velocity,
        }
    }
}

/// Externally visible placement of an agent: where it is and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub target: Vec3, // position + velocity
}

impl Pose {
    /// Unit direction of travel, zero for an agent at rest.
    pub fn facing(&self) -> Vec3 {
        math::normalize(self.target - self.position)
    }

    /// Rotation taking a model that points along +Z onto the direction of travel.
    pub fn orientation(&self) -> Quat {
        let facing = self.facing();
        if facing == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::Z, facing)
        }
    }
}

/// Per-agent record laid out for direct upload to a renderer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AgentInstance {
    pub position: [f32; 3],
    pub facing: [f32; 3],
}

impl From<&Agent> for AgentInstance {
    fn from(agent: &Agent) -> Self {
        let pose = agent.pose();
        Self {
            position: pose.position.to_array(),
            facing: pose.facing().to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn integrate_adds_velocity_then_clears_acceleration() {
        let mut agent = Agent::new(Vec3::ZERO, Vec3::new(0.01, 0.0, 0.0), 0.02, 0.01);
        agent.acceleration = Vec3::new(0.0, 0.005, 0.0);
        agent.integrate();

        assert_eq!(agent.velocity, Vec3::new(0.01, 0.005, 0.0));
        assert_eq!(agent.position, Vec3::new(0.01, 0.005, 0.0));
        assert_eq!(agent.acceleration, Vec3::ZERO);
    }

    #[test]
    fn integrate_does_not_clamp_velocity() {
        let mut agent = Agent::new(Vec3::ZERO, Vec3::new(0.02, 0.0, 0.0), 0.02, 0.01);
        for _ in 0..10 {
            agent.acceleration = Vec3::new(0.01, 0.0, 0.0);
            agent.integrate();
        }
        assert!(agent.speed() > agent.max_speed);
    }

    #[test]
    fn pose_looks_along_velocity() {
        let agent = Agent::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -0.5), 0.02, 0.01);
        let pose = agent.pose();
        assert_eq!(pose.target, Vec3::new(1.0, 2.0, 2.5));
        assert_eq!(pose.facing(), Vec3::new(0.0, 0.0, -1.0));

        let forward = pose.orientation() * Vec3::Z;
        assert!((forward - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn resting_agent_has_identity_orientation() {
        let agent = Agent::new(Vec3::ONE, Vec3::ZERO, 0.02, 0.01);
        assert_eq!(agent.pose().facing(), Vec3::ZERO);
        assert_eq!(agent.pose().orientation(), Quat::IDENTITY);
    }

    #[test]
    fn spawn_respects_extents() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let agents = AgentConfig::default();
        let spawn = SpawnConfig::default();
        for _ in 0..500 {
            let agent = Agent::spawn(&mut rng, &agents, &spawn);
            assert!(agent.position.abs().max_element() <= 60.0);
            assert!(agent.velocity.abs().max_element() <= 1.0 / 20.0);
            assert_eq!(agent.acceleration, Vec3::ZERO);
        }
    }

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<AgentInstance>(), 24);
        let agent = Agent::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.02, 0.01);
        let instance = AgentInstance::from(&agent);
        assert_eq!(instance.position, [1.0, 0.0, 0.0]);
        assert_eq!(instance.facing, [0.0, 1.0, 0.0]);
    }
}
