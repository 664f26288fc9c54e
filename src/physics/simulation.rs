//! The simulation shell: body and joint bookkeeping.
//!
//! Integration is not implemented: `step` walks the bodies and computes
//! nothing. The shell exists so scenes can be assembled and queried while
//! the solver is out of scope.

use slotmap::SlotMap;

use crate::geometry::Vector;

use super::body::{Body, BodyId, Joint};

/// Configuration for [`Simulation::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Global gravity.
    pub gravity: Vector,
    /// Timestep length during a step. Defaults to `1 / 60`.
    pub timestep_length: Option<f64>,
}

/// A rigid-body simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Global gravity.
    pub gravity: Vector,
    /// Timestep length during a step.
    pub timestep_length: f64,
    bodies: SlotMap<BodyId, Body>,
    joints: Vec<Joint>,
}

impl Simulation {
    /// Create an empty simulation.
    pub fn new(options: SimulationOptions) -> Self {
        Self {
            gravity: options.gravity,
            timestep_length: options.timestep_length.unwrap_or(1.0 / 60.0),
            bodies: SlotMap::with_key(),
            joints: Vec::new(),
        }
    }

    /// Add a body, returning its identity.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    /// Remove a body. Returns it if it existed.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        self.joints
            .retain(|joint| joint.body1 != id && joint.body2 != id);
        self.bodies.remove(id)
    }

    /// A body by identity.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// Mutable access to a body.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// Iterate all bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    /// Number of bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Add a joint between two bodies.
    pub fn add_joint(&mut self, joint: Joint) {
        self.joints.push(joint);
    }

    /// The joints between bodies.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) {
        for (_, _body) in self.bodies.iter_mut() {
            // No integration yet.
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
