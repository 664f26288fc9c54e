//! Rigid bodies and joints.

use slotmap::new_key_type;

use crate::event::EventEmitter;
use crate::geometry::Vector;

use super::shape::Shape;

new_key_type! {
    /// Identity of a body within a simulation.
    pub struct BodyId;
}

/// Whether a body responds to forces or stays fixed in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    Dynamic,
    Fixed,
}

/// Collision between two bodies, either a start or end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    /// Base body involved in the collision.
    pub base: BodyId,
    /// The other body involved in the collision.
    pub other: BodyId,
}

/// Configuration for [`Body::new`]. Unset coefficients default to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOptions {
    pub kind: BodyKind,
    pub shape: Shape,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub restitution: f64,
    pub friction: f64,
    pub mass: f64,
    pub position: Vector,
    pub rotatable: bool,
}

impl BodyOptions {
    /// A dynamic body with the given shape and zeroed coefficients.
    pub fn new(shape: Shape) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            linear_damping: 0.0,
            angular_damping: 0.0,
            restitution: 0.0,
            friction: 0.0,
            mass: 0.0,
            position: Vector::ZERO,
            rotatable: true,
        }
    }

    /// Make the body fixed (builder).
    pub fn fixed(mut self) -> Self {
        self.kind = BodyKind::Fixed;
        self
    }

    /// Set the world-space position (builder).
    pub fn at(mut self, position: Vector) -> Self {
        self.position = position;
        self
    }
}

/// A rigid body.
#[derive(Debug)]
pub struct Body {
    pub kind: BodyKind,
    pub shape: Shape,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub restitution: f64,
    pub friction: f64,
    pub mass: f64,
    /// World-space position.
    pub position: Vector,
    /// Rotation in radians.
    pub rotation: f64,
    pub velocity: Vector,
    pub angular_velocity: f64,
    /// Rotatability of the body due to contacts or forces.
    pub rotatable: bool,
    /// Emitted when two shapes start colliding.
    pub on_collision_start: EventEmitter<CollisionEvent>,
    /// Emitted when two shapes stop colliding.
    pub on_collision_end: EventEmitter<CollisionEvent>,
}

impl Body {
    /// Create a body from options.
    pub fn new(options: BodyOptions) -> Self {
        Self {
            kind: options.kind,
            shape: options.shape,
            linear_damping: options.linear_damping,
            angular_damping: options.angular_damping,
            restitution: options.restitution,
            friction: options.friction,
            mass: options.mass,
            position: options.position,
            rotation: 0.0,
            velocity: Vector::ZERO,
            angular_velocity: 0.0,
            rotatable: options.rotatable,
            on_collision_start: EventEmitter::new(),
            on_collision_end: EventEmitter::new(),
        }
    }

    /// Whether the body responds to forces.
    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Whether the body stays fixed in place.
    pub fn is_fixed(&self) -> bool {
        self.kind == BodyKind::Fixed
    }
}

/// The kind of a joint between two bodies. No kinds exist yet, so joints
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {}

/// A joint between two rigid bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joint {
    pub joint_type: JointType,
    pub body1: BodyId,
    pub body2: BodyId,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_defaults() {
        let body = Body::new(BodyOptions::new(Shape::circle(1.0)));
        assert!(body.is_dynamic());
        assert!(!body.is_fixed());
        assert_eq!(body.linear_damping, 0.0);
        assert_eq!(body.restitution, 0.0);
        assert_eq!(body.friction, 0.0);
        assert_eq!(body.position, Vector::ZERO);
        assert_eq!(body.velocity, Vector::ZERO);
        assert!(body.rotatable);
    }

    #[test]
    fn fixed_builder() {
        let body = Body::new(BodyOptions::new(Shape::circle(1.0)).fixed());
        assert!(body.is_fixed());
    }

    #[test]
    fn position_builder() {
        let body = Body::new(
            BodyOptions::new(Shape::rectangle(2.0, 2.0)).at(Vector::new(5.0, 6.0)),
        );
        assert_eq!(body.position, Vector::new(5.0, 6.0));
    }

    #[test]
    fn collision_listeners_fire() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut body = Body::new(BodyOptions::new(Shape::circle(1.0)));
        let seen = Rc::new(RefCell::new(0));
        let count = Rc::clone(&seen);
        body.on_collision_start.listen(move |_| *count.borrow_mut() += 1);

        let mut bodies = slotmap::SlotMap::<BodyId, ()>::with_key();
        let a = bodies.insert(());
        let b = bodies.insert(());
        body.on_collision_start
            .emit(&CollisionEvent { base: a, other: b });
        assert_eq!(*seen.borrow(), 1);
    }
}
