//! Local steering rules.
//!
//! Each rule turns neighbor state into a desired velocity and hands it to
//! [`seek`]. Rules read from an immutable slice of agents so they always see the
//! pre-step state of the whole flock.

use glam::Vec3;

use crate::sim::agents::Agent;
use crate::sim::math::{limit, set_mag};

/// Indices of every agent within `radius` of `agents[index]`, excluding itself.
///
/// Identity is the slice index, so an agent sharing the exact position of
/// another is still a neighbor. The boundary is inclusive.
pub fn neighbors(agents: &[Agent], index: usize, radius: f32) -> Vec<usize> {
    let origin = agents[index].position;
    agents
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != index && origin.distance(other.position) <= radius)
        .map(|(j, _)| j)
        .collect()
}

/// Steering correction toward `desired`.
///
/// `limit(set_mag(desired - velocity, max_speed), max_force)`
pub fn seek(agent: &Agent, desired: Vec3) -> Vec3 {
    limit(set_mag(desired - agent.velocity, agent.max_speed), agent.max_force)
}

fn mean_of(sum: Vec3, count: usize) -> Vec3 {
    if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f32
    }
}

/// Steer toward the mean neighbor velocity.
pub fn alignment(agent: &Agent, agents: &[Agent], neighbors: &[usize]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = neighbors.iter().map(|&j| agents[j].velocity).sum();
    seek(agent, mean_of(sum, neighbors.len()))
}

/// Steer away from neighbors.
///
/// Each neighbor contributes `(self - neighbor) / distance`. A neighbor at
/// exactly the same position has no defined direction; its term is dropped
/// while the mean still divides by the full neighbor count.
pub fn separation(agent: &Agent, agents: &[Agent], neighbors: &[usize]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let mut sum = Vec3::ZERO;
    for &j in neighbors {
        let offset = agent.position - agents[j].position;
        let d = agent.position.distance(agents[j].position);
        if d > 0.0 {
            sum += offset / d;
        } else {
            log::warn!("agent {} shares its position with a neighbor, skipping separation term", j);
        }
    }
    seek(agent, mean_of(sum, neighbors.len()))
}

/// Steer toward the mean neighbor position.
pub fn cohesion(agent: &Agent, agents: &[Agent], neighbors: &[usize]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = neighbors.iter().map(|&j| agents[j].position).sum();
    seek(agent, mean_of(sum, neighbors.len()) - agent.position)
}

/// Result of the force phase for one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub acceleration: Vec3,
    pub neighbor_count: usize,
}

/// Combined separation + alignment + cohesion for `agents[index]`.
///
/// With no neighbors no rule runs and the acceleration is exactly zero.
pub fn flocking_acceleration(agents: &[Agent], index: usize, radius: f32) -> Steering {
    let near = neighbors(agents, index, radius);
    if near.is_empty() {
        return Steering {
            acceleration: Vec3::ZERO,
            neighbor_count: 0,
        };
    }

    let agent = &agents[index];
    let mut acceleration = Vec3::ZERO;
    acceleration += separation(agent, agents, &near);
    acceleration += alignment(agent, agents, &near);
    acceleration += cohesion(agent, agents, &near);

    Steering {
        acceleration,
        neighbor_count: near.len(),
    }
}
