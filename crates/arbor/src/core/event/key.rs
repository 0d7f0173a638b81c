//! Keyboard input primitives.

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Modifiers {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
    /// The platform command key is active.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control only.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Is any modifier held?
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// A logical key.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Key {
    /// A key producing a character.
    Char(char),
    /// Return or enter.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key F1..F24.
    F(u8),
    /// A platform key code with no logical mapping.
    Other(u32),
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            '\n' | '\r' => Self::Enter,
            '\t' => Self::Tab,
            ' ' => Self::Space,
            c => Self::Char(c),
        }
    }
}

/// A key press or release.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// The character the key produces, if any.
    pub text: Option<char>,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
    /// Is this an auto-repeat?
    pub repeat: bool,
}

impl KeyEvent {
    /// An unmodified, non-repeating key event.
    pub fn new(key: impl Into<Key>) -> Self {
        let key = key.into();
        let text = match key {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        };
        Self {
            key,
            text,
            modifiers: Modifiers::NONE,
            repeat: false,
        }
    }

    /// This event with modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyEvent {
    fn from(k: Key) -> Self {
        Self::new(k)
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::new(c)
    }
}
