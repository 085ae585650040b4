use std::fmt;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sim::agents::{Agent, AgentInstance, Pose};
use crate::sim::steering::{flocking_acceleration, Steering};
use murmur_params::{ConfigError, FlockConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum FlockInitError {
    Config(ConfigError),
    NonFiniteAgent { index: usize },
    InvalidAgentLimits { index: usize },
}

impl fmt::Display for FlockInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockInitError::Config(e) => write!(f, "{}", e),
            FlockInitError::NonFiniteAgent { index } => {
                write!(f, "agent {index} has a non-finite position or velocity")
            }
            FlockInitError::InvalidAgentLimits { index } => {
                write!(f, "agent {index} needs positive, finite max_speed and max_force")
            }
        }
    }
}

impl std::error::Error for FlockInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlockInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for FlockInitError {
    fn from(e: ConfigError) -> Self {
        FlockInitError::Config(e)
    }
}

/// Flock statistics for metrics collection
#[derive(Debug, Clone, PartialEq)]
pub struct FlockStats {
    pub agent_count: u32,
    pub mean_speed: f32,
    pub max_speed: f32,
    pub mean_neighbors: f32,
    pub isolated_count: u32,   // Agents with no neighbors during the last step
    pub over_speed_count: u32, // Agents whose velocity has drifted past max_speed
    pub centroid: Vec3,
}

impl Default for FlockStats {
    fn default() -> Self {
        Self {
            agent_count: 0,
            mean_speed: 0.0,
            max_speed: 0.0,
            mean_neighbors: 0.0,
            isolated_count: 0,
            over_speed_count: 0,
            centroid: Vec3::ZERO,
        }
    }
}

/// The simulation: owns every agent and advances them one frame per `step()`.
#[derive(Debug, Clone)]
pub struct Flock {
    agents: Vec<Agent>,
    config: FlockConfig,
    neighbor_counts: Vec<usize>,
    step_count: u64,
    pub stats: FlockStats,
}

impl Flock {
    /// Spawn `config.agents.count` agents from `config.world.seed`.
    pub fn new(config: &FlockConfig) -> Result<Self, FlockInitError> {
        config.validate()?;

        let agents = spawn_agents(config, config.agents.count as usize, config.world.seed);
        log::info!(
            "Spawned {} agents (seed {}, neighbor radius {})",
            agents.len(),
            config.world.seed,
            config.perception.neighbor_radius
        );

        Ok(Self::with_agents(agents, config.clone()))
    }

    /// Build a flock around an explicit agent snapshot.
    ///
    /// Only the perception and spawn sections of `config` are used; the agent
    /// count is taken from `agents`.
    pub fn from_agents(agents: Vec<Agent>, config: &FlockConfig) -> Result<Self, FlockInitError> {
        config.validate()?;

        for (index, agent) in agents.iter().enumerate() {
            if !agent.position.is_finite() || !agent.velocity.is_finite() {
                return Err(FlockInitError::NonFiniteAgent { index });
            }
            let limits_ok = agent.max_speed.is_finite()
                && agent.max_speed > 0.0
                && agent.max_force.is_finite()
                && agent.max_force > 0.0;
            if !limits_ok {
                return Err(FlockInitError::InvalidAgentLimits { index });
            }
        }

        Ok(Self::with_agents(agents, config.clone()))
    }

    fn with_agents(mut agents: Vec<Agent>, config: FlockConfig) -> Self {
        for agent in &mut agents {
            agent.acceleration = Vec3::ZERO;
        }
        let neighbor_counts = vec![0; agents.len()];
        Self {
            agents,
            config,
            neighbor_counts,
            step_count: 0,
            stats: FlockStats::default(),
        }
    }

    /// Advance the whole flock by one frame.
    ///
    /// Every acceleration is computed from the pre-step snapshot before any
    /// agent moves, so the result does not depend on agent order.
    pub fn step(&mut self) {
        self.apply_forces();
        self.integrate();
        self.step_count += 1;

        log::debug!(
            "step {}: {} agents, {} isolated",
            self.step_count,
            self.agents.len(),
            self.neighbor_counts.iter().filter(|&&n| n == 0).count()
        );
    }

    /// Force phase: fill every agent's acceleration from the current state.
    pub fn apply_forces(&mut self) {
        let radius = self.config.perception.neighbor_radius;
        let forces: Vec<Steering> = (0..self.agents.len())
            .map(|i| flocking_acceleration(&self.agents, i, radius))
            .collect();

        for ((agent, count), steering) in self
            .agents
            .iter_mut()
            .zip(self.neighbor_counts.iter_mut())
            .zip(forces)
        {
            agent.acceleration = steering.acceleration;
            *count = steering.neighbor_count;
        }
    }

    /// Integrate phase: move every agent and clear its acceleration.
    pub fn integrate(&mut self) {
        for agent in &mut self.agents {
            agent.integrate();
        }
    }

    /// Respawn the same number of agents from a new seed.
    pub fn reset(&mut self, seed: u64) {
        let count = self.agents.len();
        self.config.world.seed = seed;
        self.agents = spawn_agents(&self.config, count, seed);
        self.neighbor_counts = vec![0; count];
        self.step_count = 0;
        self.stats = FlockStats::default();
        log::info!("Reset flock of {} agents with seed {}", count, seed);
    }

    pub fn update_stats(&mut self) {
        if self.agents.is_empty() {
            self.stats = FlockStats::default();
            return;
        }

        let n = self.agents.len() as f32;
        let speeds = self.agents.iter().map(Agent::speed);
        let total_speed: f32 = speeds.clone().sum();
        let max_speed = speeds.fold(0.0f32, f32::max);
        let centroid = self.agents.iter().map(|a| a.position).sum::<Vec3>() / n;
        let total_neighbors: usize = self.neighbor_counts.iter().sum();
        let isolated_count = self.neighbor_counts.iter().filter(|&&c| c == 0).count() as u32;
        let over_speed_count = self
            .agents
            .iter()
            .filter(|a| a.speed() > a.max_speed)
            .count() as u32;

        self.stats = FlockStats {
            agent_count: self.agents.len() as u32,
            mean_speed: total_speed / n,
            max_speed,
            mean_neighbors: total_neighbors as f32 / n,
            isolated_count,
            over_speed_count,
            centroid,
        };
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Neighbor count per agent as seen by the most recent force phase.
    pub fn neighbor_counts(&self) -> &[usize] {
        &self.neighbor_counts
    }

    pub fn poses(&self) -> impl Iterator<Item = Pose> + '_ {
        self.agents.iter().map(Agent::pose)
    }

    /// Refill `out` with one render instance per agent, in agent order.
    pub fn write_instances(&self, out: &mut Vec<AgentInstance>) {
        out.clear();
        out.extend(self.agents.iter().map(AgentInstance::from));
    }
}

fn spawn_agents(config: &FlockConfig, count: usize, seed: u64) -> Vec<Agent> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Agent::spawn(&mut rng, &config.agents, &config.spawn))
        .collect()
}
