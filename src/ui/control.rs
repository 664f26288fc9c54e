//! Control payloads: kinds, button levels, native bindings.

use std::rc::Rc;

use crate::display::Stage;
use crate::event::EventEmitter;
use crate::geometry::Vector;
use crate::tree::{Labeled, NodeId};
use crate::ui::focus::FocusNeighbors;
use crate::ui::native::{ElementId, MouseEvent, Tag};
use crate::ui::theme::Theme;

/// Identity of a control in the control tree.
pub type ControlId = NodeId;

// ---------------------------------------------------------------------------
// ButtonLevel / ButtonEvents
// ---------------------------------------------------------------------------

/// A button's emphasis level, selecting its theme class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLevel {
    Primary,
    Secondary,
    Danger,
}

impl ButtonLevel {
    fn as_str(self) -> &'static str {
        match self {
            ButtonLevel::Primary => "primary",
            ButtonLevel::Secondary => "secondary",
            ButtonLevel::Danger => "danger",
        }
    }
}

/// Mouse event emitters of a button control.
#[derive(Debug, Default)]
pub struct ButtonEvents {
    /// Press (click) event.
    pub on_pressed: EventEmitter<MouseEvent>,
    /// The mouse started pressing the control.
    pub on_mouse_down: EventEmitter<MouseEvent>,
    /// The mouse stopped pressing the control.
    pub on_mouse_up: EventEmitter<MouseEvent>,
    /// The pointer entered the control.
    pub on_mouse_over: EventEmitter<MouseEvent>,
    /// The pointer left the control.
    pub on_mouse_out: EventEmitter<MouseEvent>,
}

// ---------------------------------------------------------------------------
// ControlKind
// ---------------------------------------------------------------------------

/// Configuration for stage-embedding controls.
#[derive(Debug, Clone, PartialEq)]
pub struct StageContainerOptions {
    /// Stage's fit mode.
    pub fit: crate::display::Fit,
    /// Initial stage size.
    pub size: Vector,
    /// A CSS background color for the canvas.
    pub background: Option<String>,
}

/// What a control is. Each kind fixes its native tag, theme-class tag, and
/// focusability policy.
#[derive(Debug)]
pub enum ControlKind {
    /// The top control of the user interface hierarchy. Created once, by the
    /// [`Ui`](crate::ui::Ui) bootstrap only.
    Application,
    Button {
        level: ButtonLevel,
        events: ButtonEvents,
    },
    /// Displays text, possibly selectable.
    Label,
    /// Displays a heading title, level 1 to 4.
    HeadingTitle { level: u8 },
    /// Displays a subtitle.
    Subtitle,
    /// Displays a paragraph, possibly selectable.
    Paragraph,
    /// Embeds a 2D display stage into the user interface.
    StageContainer { stage: Stage },
}

impl ControlKind {
    /// The native element tag this kind binds to.
    pub fn tag(&self) -> Tag {
        match self {
            ControlKind::Application => Tag::Div,
            ControlKind::Button { .. } => Tag::Button,
            ControlKind::Label => Tag::Span,
            ControlKind::HeadingTitle { level } => Tag::Heading(*level),
            ControlKind::Subtitle => Tag::Span,
            ControlKind::Paragraph => Tag::Paragraph,
            ControlKind::StageContainer { .. } => Tag::Canvas,
        }
    }

    /// The theme-class tag appended to a theme's class prefix during a
    /// cascade.
    pub fn theme_class(&self) -> String {
        match self {
            ControlKind::Application => "application".to_owned(),
            ControlKind::Button { level, .. } => format!("button-{}", level.as_str()),
            ControlKind::Label => "label".to_owned(),
            ControlKind::HeadingTitle { level } => format!("heading-title-{level}"),
            ControlKind::Subtitle => "subtitle".to_owned(),
            ControlKind::Paragraph => "paragraph".to_owned(),
            ControlKind::StageContainer { .. } => "stage-container".to_owned(),
        }
    }

    /// Whether controls of this kind can receive focus.
    pub fn focusable(&self) -> bool {
        matches!(self, ControlKind::Button { .. })
    }
}

// ---------------------------------------------------------------------------
// ControlData
// ---------------------------------------------------------------------------

/// Payload of one control-tree node.
///
/// A control is bound to exactly one native element for its entire lifetime;
/// the binding is established at construction and never changes.
#[derive(Debug)]
pub struct ControlData {
    pub(crate) kind: ControlKind,
    pub(crate) id: Option<String>,
    pub(crate) element: ElementId,
    /// The control's own theme reference. Absent means inherited from the
    /// nearest themed ancestor; recorded here once a cascade resolves it.
    pub(crate) theme: Option<Rc<Theme>>,
    pub(crate) focus_neighbors: FocusNeighbors,
}

impl ControlData {
    pub(crate) fn new(kind: ControlKind, element: ElementId) -> Self {
        Self {
            kind,
            id: None,
            element,
            theme: None,
            focus_neighbors: FocusNeighbors::default(),
        }
    }

    /// The control's kind.
    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// The bound native element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The control's path identifier.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The control's own (or recorded) theme reference.
    pub fn theme(&self) -> Option<&Rc<Theme>> {
        self.theme.as_ref()
    }
}

impl Labeled for ControlData {
    fn label(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags() {
        assert_eq!(ControlKind::Application.tag(), Tag::Div);
        assert_eq!(
            ControlKind::Button {
                level: ButtonLevel::Primary,
                events: ButtonEvents::default()
            }
            .tag(),
            Tag::Button
        );
        assert_eq!(ControlKind::Label.tag(), Tag::Span);
        assert_eq!(ControlKind::HeadingTitle { level: 3 }.tag(), Tag::Heading(3));
        assert_eq!(ControlKind::Subtitle.tag(), Tag::Span);
        assert_eq!(ControlKind::Paragraph.tag(), Tag::Paragraph);
    }

    #[test]
    fn theme_classes() {
        assert_eq!(ControlKind::Application.theme_class(), "application");
        assert_eq!(ControlKind::Label.theme_class(), "label");
        assert_eq!(
            ControlKind::HeadingTitle { level: 2 }.theme_class(),
            "heading-title-2"
        );
        assert_eq!(ControlKind::Subtitle.theme_class(), "subtitle");
        assert_eq!(ControlKind::Paragraph.theme_class(), "paragraph");
        for (level, expected) in [
            (ButtonLevel::Primary, "button-primary"),
            (ButtonLevel::Secondary, "button-secondary"),
            (ButtonLevel::Danger, "button-danger"),
        ] {
            let kind = ControlKind::Button {
                level,
                events: ButtonEvents::default(),
            };
            assert_eq!(kind.theme_class(), expected);
        }
    }

    #[test]
    fn only_buttons_are_focusable() {
        assert!(ControlKind::Button {
            level: ButtonLevel::Primary,
            events: ButtonEvents::default()
        }
        .focusable());
        assert!(!ControlKind::Application.focusable());
        assert!(!ControlKind::Label.focusable());
        assert!(!ControlKind::Subtitle.focusable());
        assert!(!ControlKind::Paragraph.focusable());
        assert!(!ControlKind::HeadingTitle { level: 1 }.focusable());
    }

    #[test]
    fn control_data_defaults() {
        let data = ControlData::new(ControlKind::Label, ElementId(7));
        assert_eq!(data.element(), ElementId(7));
        assert!(data.id().is_none());
        assert!(data.theme().is_none());
        assert_eq!(data.focus_neighbors, FocusNeighbors::default());
        assert_eq!(data.label(), None);
    }
}
