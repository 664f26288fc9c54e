//! Focus neighbors: per-control overrides of default focus traversal.

use tracing::debug;

use crate::render::RenderBackend;
use crate::ui::native::NativeBackend;
use crate::ui::{Ui, UiError};

// ---------------------------------------------------------------------------
// FocusNeighbors
// ---------------------------------------------------------------------------

/// Indicates focus neighbors for a control.
///
/// Each field is a control path resolved against the control itself. A set
/// path overrides the default document-order traversal in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusNeighbors {
    /// Path to a left neighbor.
    pub left: Option<String>,
    /// Path to a right neighbor.
    pub right: Option<String>,
    /// Path to a top neighbor.
    pub top: Option<String>,
    /// Path to a bottom neighbor.
    pub bottom: Option<String>,
}

/// A focus traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for FocusDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FocusDirection::Left => "left",
            FocusDirection::Right => "right",
            FocusDirection::Up => "top",
            FocusDirection::Down => "bottom",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

impl<N: NativeBackend, R: RenderBackend> Ui<N, R> {
    /// Apply focus navigation for the currently pressed `ui*` actions.
    ///
    /// Called after every key-down dispatch. If a direction's neighbor path
    /// is set it must resolve; an unresolvable path is a fatal
    /// [`UiError::FocusNeighborUnresolved`]. Without a path, focus falls
    /// back to the document's previous/next focusable element.
    pub fn navigate_focus(&mut self) -> Result<(), UiError> {
        let Some(element) = self.native_focused_element() else {
            return Ok(());
        };
        let Some(control) = self.control_from_element(element) else {
            return Ok(());
        };

        for (direction, action) in [
            (FocusDirection::Left, "uiLeft"),
            (FocusDirection::Right, "uiRight"),
            (FocusDirection::Up, "uiUp"),
            (FocusDirection::Down, "uiDown"),
        ] {
            if !self.input().is_pressed(action)? {
                continue;
            }

            let neighbors = self
                .focus_neighbors(control)
                .cloned()
                .unwrap_or_default();
            let path = match direction {
                FocusDirection::Left => neighbors.left,
                FocusDirection::Right => neighbors.right,
                FocusDirection::Up => neighbors.top,
                FocusDirection::Down => neighbors.bottom,
            };

            match path {
                Some(path) => {
                    let Some(neighbor) = self.resolve(control, &path) else {
                        return Err(UiError::FocusNeighborUnresolved { direction, path });
                    };
                    debug!(%direction, "focusing neighbor control");
                    self.focus(neighbor);
                }
                None => match direction {
                    FocusDirection::Left | FocusDirection::Up => {
                        self.native_focus_previous(element);
                    }
                    FocusDirection::Right | FocusDirection::Down => {
                        self.native_focus_next(element);
                    }
                },
            }
            break;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_default_to_unset() {
        let neighbors = FocusNeighbors::default();
        assert!(neighbors.left.is_none());
        assert!(neighbors.right.is_none());
        assert!(neighbors.top.is_none());
        assert!(neighbors.bottom.is_none());
    }

    #[test]
    fn direction_display_matches_field_names() {
        assert_eq!(FocusDirection::Left.to_string(), "left");
        assert_eq!(FocusDirection::Right.to_string(), "right");
        assert_eq!(FocusDirection::Up.to_string(), "top");
        assert_eq!(FocusDirection::Down.to_string(), "bottom");
    }
}
