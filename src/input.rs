//! Input action map: logical actions resolved against live key state.
//!
//! An action name maps to a list of [`ActionAtom`]s, the alternative
//! physical triggers satisfying it. The pressed-state table records, per
//! physical key, whether the key is held and which modifiers were held when
//! it went down. All state is
//! fed by the embedding's raw key-down/key-up events; nothing here listens to
//! an event source directly.

use std::collections::HashMap;
use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A physical keyboard key, decoupled from any concrete event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyChord / ActionAtom
// ---------------------------------------------------------------------------

/// A physical key plus the exact modifier state required to match.
///
/// Modifiers are exact-match, not at-least: a chord with no modifiers does
/// not match while control is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// A chord requiring `key` with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Require control to be held (builder).
    pub fn control(mut self) -> Self {
        self.modifiers = self.modifiers | Modifiers::CTRL;
        self
    }

    /// Require shift to be held (builder).
    pub fn shift(mut self) -> Self {
        self.modifiers = self.modifiers | Modifiers::SHIFT;
        self
    }

    /// Require alt to be held (builder).
    pub fn alt(mut self) -> Self {
        self.modifiers = self.modifiers | Modifiers::ALT;
        self
    }
}

/// One alternative physical trigger for a logical action.
///
/// Key chords are the only variant today; the enum leaves room for other
/// trigger kinds (gamepad, pointer gestures) without reshaping the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionAtom {
    Chord(KeyChord),
}

impl From<KeyChord> for ActionAtom {
    fn from(chord: KeyChord) -> Self {
        ActionAtom::Chord(chord)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Errors from action queries.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input action {0:?} is not registered")]
    UnknownAction(String),
}

/// Live pressed/modifier state for one physical key.
#[derive(Debug, Clone, Copy, Default)]
struct PressedState {
    pressed: bool,
    modifiers: Modifiers,
}

/// The input action map plus the pressed-state table.
#[derive(Debug, Default)]
pub struct Input {
    map: HashMap<String, Vec<ActionAtom>>,
    pressed: HashMap<Key, PressedState>,
}

impl Input {
    /// Create an input with an empty action map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole action map.
    pub fn set_map(&mut self, map: HashMap<String, Vec<ActionAtom>>) {
        self.map = map;
    }

    /// Register (or replace) the atoms for a single action.
    pub fn set_action(
        &mut self,
        name: impl Into<String>,
        atoms: impl IntoIterator<Item = ActionAtom>,
    ) {
        self.map.insert(name.into(), atoms.into_iter().collect());
    }

    /// Read-only view of the action map.
    pub fn map(&self) -> &HashMap<String, Vec<ActionAtom>> {
        &self.map
    }

    /// The default user-interface action map:
    ///
    /// * `uiLeft` — focus the left neighbor of a control.
    /// * `uiRight` — focus the right neighbor of a control.
    /// * `uiUp` — focus the top neighbor of a control.
    /// * `uiDown` — focus the bottom neighbor of a control.
    pub fn default_ui_map() -> HashMap<String, Vec<ActionAtom>> {
        [
            ("uiLeft", Key::Left),
            ("uiRight", Key::Right),
            ("uiUp", Key::Up),
            ("uiDown", Key::Down),
        ]
        .into_iter()
        .map(|(name, key)| (name.to_owned(), vec![KeyChord::new(key).into()]))
        .collect()
    }

    /// Record a raw key-down: the key becomes pressed and the modifier state
    /// is snapshot.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) {
        let state = self.pressed.entry(key).or_default();
        state.pressed = true;
        state.modifiers = modifiers;
    }

    /// Record a raw key-up: the key becomes released and its modifier
    /// snapshot is cleared.
    pub fn key_up(&mut self, key: Key) {
        let state = self.pressed.entry(key).or_default();
        state.pressed = false;
        state.modifiers = Modifiers::NONE;
    }

    /// Whether any atom of the named action currently matches.
    ///
    /// A chord matches when its key is held and the held modifier state
    /// equals the chord's exactly. Querying an unregistered action is a
    /// programmer error surfaced as [`InputError::UnknownAction`].
    pub fn is_pressed(&self, name: &str) -> Result<bool, InputError> {
        let atoms = self
            .map
            .get(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_owned()))?;
        Ok(atoms.iter().any(|atom| self.atom_matches(atom)))
    }

    fn atom_matches(&self, atom: &ActionAtom) -> bool {
        match atom {
            ActionAtom::Chord(chord) => self
                .pressed
                .get(&chord.key)
                .is_some_and(|state| state.pressed && state.modifiers == chord.modifiers),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn move_left_input() -> Input {
        let mut input = Input::new();
        input.set_action(
            "moveLeft",
            [
                KeyChord::new(Key::Char('a')).into(),
                KeyChord::new(Key::Left).into(),
            ],
        );
        input
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── KeyChord builder ─────────────────────────────────────────────

    #[test]
    fn chord_builder() {
        let chord = KeyChord::new(Key::Char('x')).control().shift();
        assert_eq!(chord.key, Key::Char('x'));
        assert_eq!(chord.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
    }

    // ── is_pressed ───────────────────────────────────────────────────

    #[test]
    fn pressed_without_modifiers() {
        let mut input = move_left_input();
        input.key_down(Key::Char('a'), Modifiers::NONE);
        assert!(input.is_pressed("moveLeft").unwrap());
    }

    #[test]
    fn unmodified_chord_rejects_held_control() {
        let mut input = move_left_input();
        input.key_down(Key::Char('a'), Modifiers::CTRL);
        assert!(!input.is_pressed("moveLeft").unwrap());
    }

    #[test]
    fn modified_chord_requires_its_modifier() {
        let mut input = Input::new();
        input.set_action("copy", [KeyChord::new(Key::Char('c')).control().into()]);

        input.key_down(Key::Char('c'), Modifiers::NONE);
        assert!(!input.is_pressed("copy").unwrap());

        input.key_down(Key::Char('c'), Modifiers::CTRL);
        assert!(input.is_pressed("copy").unwrap());

        // Extra modifiers break an exact match.
        input.key_down(Key::Char('c'), Modifiers::CTRL | Modifiers::SHIFT);
        assert!(!input.is_pressed("copy").unwrap());
    }

    #[test]
    fn any_alternative_atom_matches() {
        let mut input = move_left_input();
        input.key_down(Key::Left, Modifiers::NONE);
        assert!(input.is_pressed("moveLeft").unwrap());
    }

    #[test]
    fn key_up_clears_state() {
        let mut input = move_left_input();
        input.key_down(Key::Char('a'), Modifiers::NONE);
        input.key_up(Key::Char('a'));
        assert!(!input.is_pressed("moveLeft").unwrap());
    }

    #[test]
    fn unknown_action_is_an_error() {
        let input = Input::new();
        let err = input.is_pressed("nope").unwrap_err();
        assert!(matches!(err, InputError::UnknownAction(name) if name == "nope"));
    }

    #[test]
    fn set_map_replaces_everything() {
        let mut input = move_left_input();
        input.set_map(Input::default_ui_map());
        assert!(input.is_pressed("moveLeft").is_err());
        assert!(!input.is_pressed("uiLeft").unwrap());
    }

    #[test]
    fn default_ui_map_arrow_bindings() {
        let mut input = Input::new();
        input.set_map(Input::default_ui_map());
        input.key_down(Key::Down, Modifiers::NONE);
        assert!(input.is_pressed("uiDown").unwrap());
        assert!(!input.is_pressed("uiUp").unwrap());
    }

    #[test]
    fn modifier_snapshot_is_per_key() {
        let mut input = Input::new();
        input.set_action("a", [KeyChord::new(Key::Char('a')).into()]);
        input.set_action("b", [KeyChord::new(Key::Char('b')).control().into()]);

        input.key_down(Key::Char('b'), Modifiers::CTRL);
        input.key_down(Key::Char('a'), Modifiers::NONE);

        assert!(input.is_pressed("a").unwrap());
        assert!(input.is_pressed("b").unwrap());
    }
}
