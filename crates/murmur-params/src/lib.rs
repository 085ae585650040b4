//! Shared parameter types for the Murmur flocking simulation
//!
//! This crate holds every tunable used by the core and by the headless runner so
//! that both read the same values from the same place.

use std::fmt;

/// Run-level configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    pub steps: u32,
    pub seed: u64,
}

/// Per-agent population and steering limits
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub count: u32,
    pub max_speed: f32, // Magnitude of the desired velocity used by seek
    pub max_force: f32, // Per-axis ceiling on a single steering correction
}

/// Neighbor sensing
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerceptionConfig {
    pub neighbor_radius: f32,
}

/// Initial placement of agents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    pub position_extent: f32,  // Half-width of the spawn cube
    pub velocity_extent: f32,  // Half-width of the velocity cube, before scaling
    pub velocity_divisor: f32, // Sampled velocities are divided by this
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlockConfig {
    pub world: WorldConfig,
    pub agents: AgentConfig,
    pub perception: PerceptionConfig,
    pub spawn: SpawnConfig,
}

/// Reference values the simulation was tuned with.
pub mod defaults {
    pub const AGENT_COUNT: u32 = 2000;
    pub const NEIGHBOR_RADIUS: f32 = 5.0;
    pub const MAX_SPEED: f32 = 0.02;
    pub const MAX_FORCE: f32 = 0.01;
    pub const SPAWN_POSITION_EXTENT: f32 = 60.0;
    pub const SPAWN_VELOCITY_EXTENT: f32 = 1.0;
    pub const SPAWN_VELOCITY_DIVISOR: f32 = 20.0;
    pub const STEPS: u32 = 2000;
    pub const SEED: u64 = 1337;
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            steps: defaults::STEPS,
            seed: defaults::SEED,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            count: defaults::AGENT_COUNT,
            max_speed: defaults::MAX_SPEED,
            max_force: defaults::MAX_FORCE,
        }
    }
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            neighbor_radius: defaults::NEIGHBOR_RADIUS,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            position_extent: defaults::SPAWN_POSITION_EXTENT,
            velocity_extent: defaults::SPAWN_VELOCITY_EXTENT,
            velocity_divisor: defaults::SPAWN_VELOCITY_DIVISOR,
        }
    }
}

/// Reasons a configuration is rejected before any agent is created.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidMaxSpeed(f32),
    InvalidMaxForce(f32),
    InvalidNeighborRadius(f32),
    InvalidPositionExtent(f32),
    InvalidVelocityExtent(f32),
    InvalidVelocityDivisor(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMaxSpeed(v) => {
                write!(f, "max_speed must be positive and finite, got {v}")
            }
            ConfigError::InvalidMaxForce(v) => {
                write!(f, "max_force must be positive and finite, got {v}")
            }
            ConfigError::InvalidNeighborRadius(v) => {
                write!(f, "neighbor_radius must be non-negative and finite, got {v}")
            }
            ConfigError::InvalidPositionExtent(v) => {
                write!(f, "spawn position_extent must be non-negative and finite, got {v}")
            }
            ConfigError::InvalidVelocityExtent(v) => {
                write!(f, "spawn velocity_extent must be non-negative and finite, got {v}")
            }
            ConfigError::InvalidVelocityDivisor(v) => {
                write!(f, "spawn velocity_divisor must be positive and finite, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

impl FlockConfig {
    /// Check every tunable. Zero agents is allowed; an empty flock simply never moves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.agents.max_speed) {
            return Err(ConfigError::InvalidMaxSpeed(self.agents.max_speed));
        }
        if !positive(self.agents.max_force) {
            return Err(ConfigError::InvalidMaxForce(self.agents.max_force));
        }
        if !non_negative(self.perception.neighbor_radius) {
            return Err(ConfigError::InvalidNeighborRadius(
                self.perception.neighbor_radius,
            ));
        }
        if !non_negative(self.spawn.position_extent) {
            return Err(ConfigError::InvalidPositionExtent(self.spawn.position_extent));
        }
        if !non_negative(self.spawn.velocity_extent) {
            return Err(ConfigError::InvalidVelocityExtent(self.spawn.velocity_extent));
        }
        if !positive(self.spawn.velocity_divisor) {
            return Err(ConfigError::InvalidVelocityDivisor(
                self.spawn.velocity_divisor,
            ));
        }
        Ok(())
    }

    /// Log the effective parameters for a run
    pub fn log_summary(&self) {
        log::info!(
            "Agents: {} (max_speed={}, max_force={})",
            self.agents.count,
            self.agents.max_speed,
            self.agents.max_force
        );
        log::info!("Neighbor radius: {}", self.perception.neighbor_radius);
        log::info!(
            "Spawn: position +/-{}, velocity +/-{} / {}",
            self.spawn.position_extent,
            self.spawn.velocity_extent,
            self.spawn.velocity_divisor
        );
        log::info!("Steps: {}, seed: {}", self.world.steps, self.world.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = FlockConfig::default();
        assert_eq!(config.agents.count, 2000);
        assert_eq!(config.perception.neighbor_radius, 5.0);
        assert_eq!(config.agents.max_speed, 0.02);
        assert_eq!(config.agents.max_force, 0.01);
        assert_eq!(config.spawn.position_extent, 60.0);
        assert_eq!(config.spawn.velocity_extent, 1.0);
        assert_eq!(config.spawn.velocity_divisor, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_limits() {
        let mut config = FlockConfig::default();
        config.agents.max_speed = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxSpeed(0.0)));

        let mut config = FlockConfig::default();
        config.agents.max_force = -0.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxForce(-0.5)));
    }

    #[test]
    fn rejects_non_finite_radius_and_zero_divisor() {
        let mut config = FlockConfig::default();
        config.perception.neighbor_radius = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNeighborRadius(_))
        ));

        let mut config = FlockConfig::default();
        config.spawn.velocity_divisor = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidVelocityDivisor(0.0))
        );
    }

    #[test]
    fn zero_extents_are_accepted() {
        let mut config = FlockConfig::default();
        config.spawn.position_extent = 0.0;
        config.spawn.velocity_extent = 0.0;
        config.perception.neighbor_radius = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn error_messages_name_the_field() {
        let msg = ConfigError::InvalidVelocityDivisor(0.0).to_string();
        assert!(msg.contains("velocity_divisor"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = "agents:\n  count: 64\nworld:\n  seed: 7\n";
        let config: FlockConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.agents.count, 64);
        assert_eq!(config.agents.max_speed, defaults::MAX_SPEED);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.steps, defaults::STEPS);
        assert_eq!(config.perception, PerceptionConfig::default());
    }
}
