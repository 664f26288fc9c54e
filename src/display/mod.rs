//! 2D display scene graph: display objects and the stage that renders them.

pub mod object;
pub mod stage;

pub use object::{DisplayKind, DisplayObject, Filter};
pub use stage::{Fit, Stage, StageError, StageMount, StageOptions};
