//! Minimal 2D rigid-body physics shell. No solver is implemented.

pub mod body;
pub mod shape;
pub mod simulation;

pub use body::{Body, BodyId, BodyKind, BodyOptions, CollisionEvent, Joint, JointType};
pub use shape::Shape;
pub use simulation::{Simulation, SimulationOptions};
