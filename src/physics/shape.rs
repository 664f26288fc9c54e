//! Geometric shapes used by rigid bodies.

use crate::geometry::Vector;

/// Geometric shape used by a [`Body`](crate::physics::Body): a circle or a
/// polygon. Rectangles are a polygon constructor, not a separate variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        radius: f64,
        /// Offset from the body's position.
        position: Vector,
    },
    Polygon {
        vertices: Vec<Vector>,
        /// Offset from the body's position.
        position: Vector,
    },
}

impl Shape {
    /// A circle with the given radius.
    pub fn circle(radius: f64) -> Self {
        Shape::Circle {
            radius,
            position: Vector::ZERO,
        }
    }

    /// A polygon with the given vertices, in order.
    pub fn polygon(vertices: Vec<Vector>) -> Self {
        Shape::Polygon {
            vertices,
            position: Vector::ZERO,
        }
    }

    /// An axis-aligned rectangle, expressed as its four corner vertices.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Shape::Polygon {
            vertices: vec![
                Vector::new(0.0, 0.0),
                Vector::new(width, 0.0),
                Vector::new(width, height),
                Vector::new(0.0, height),
            ],
            position: Vector::ZERO,
        }
    }

    /// Offset the shape from its body's position (builder).
    pub fn at(mut self, offset: Vector) -> Self {
        match &mut self {
            Shape::Circle { position, .. } | Shape::Polygon { position, .. } => {
                *position = offset;
            }
        }
        self
    }

    /// The shape's offset from its body's position.
    pub fn position(&self) -> Vector {
        match self {
            Shape::Circle { position, .. } | Shape::Polygon { position, .. } => *position,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_is_a_four_vertex_polygon() {
        let shape = Shape::rectangle(4.0, 2.0);
        match shape {
            Shape::Polygon { vertices, position } => {
                assert_eq!(
                    vertices,
                    vec![
                        Vector::new(0.0, 0.0),
                        Vector::new(4.0, 0.0),
                        Vector::new(4.0, 2.0),
                        Vector::new(0.0, 2.0),
                    ]
                );
                assert_eq!(position, Vector::ZERO);
            }
            Shape::Circle { .. } => panic!("expected a polygon"),
        }
    }

    #[test]
    fn circle_keeps_radius() {
        let shape = Shape::circle(3.0);
        assert!(matches!(shape, Shape::Circle { radius, .. } if radius == 3.0));
    }

    #[test]
    fn at_offsets_any_shape() {
        let offset = Vector::new(1.0, 2.0);
        assert_eq!(Shape::circle(1.0).at(offset).position(), offset);
        assert_eq!(Shape::rectangle(1.0, 1.0).at(offset).position(), offset);
    }
}
