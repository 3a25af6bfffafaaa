//! Event records and the values they carry

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Type tag of an event record
///
/// Handlers are keyed by this tag. The built-in kinds cover what the bundled
/// backends produce; applications can define their own with [`EventKind::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The environment asked the application to close
    Quit,
    /// Mouse button pressed (`button`, `pos`, `mods`)
    Click,
    /// Mouse button released (`button`, `pos`, `mods`)
    Release,
    /// Mouse moved with a button held (`button`, `pos`, `mods`)
    Drag,
    /// Mouse moved with no button held (`pos`)
    Hover,
    /// Wheel scrolled (`delta`, `pos`)
    Scroll,
    /// Key pressed or repeated (`key`, `mods`, and `char` for printable keys)
    KeyPress,
    /// Key released (`key`, `mods`)
    KeyRelease,
    /// Surface resized (`size`)
    Resize,
    /// Focus changed (`gained`)
    Focus,
    /// Bracketed paste (`text`)
    Paste,
    /// Application-defined event
    User(u32),
}

/// Attribute value carried by an [`EventRecord`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Integer coordinate pair, e.g. a cursor position or a size
    Point(i32, i32),
    Key(KeyCode),
    Button(MouseButton),
    Mods(Modifiers),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<(i32, i32)> {
        match self {
            Value::Point(x, y) => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<KeyCode> {
        match self {
            Value::Key(k) => Some(*k),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<MouseButton> {
        match self {
            Value::Button(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mods(&self) -> Option<Modifiers> {
        match self {
            Value::Mods(m) => Some(*m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Text(c.to_string())
    }
}

impl From<(i32, i32)> for Value {
    fn from((x, y): (i32, i32)) -> Self {
        Value::Point(x, y)
    }
}

impl From<KeyCode> for Value {
    fn from(k: KeyCode) -> Self {
        Value::Key(k)
    }
}

impl From<MouseButton> for Value {
    fn from(b: MouseButton) -> Self {
        Value::Button(b)
    }
}

impl From<Modifiers> for Value {
    fn from(m: Modifiers) -> Self {
        Value::Mods(m)
    }
}

/// One input occurrence: a type tag and a flat, ordered attribute mapping
///
/// Records are built once by the event source and never mutated afterwards;
/// the builder methods consume the record.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    kind: EventKind,
    attributes: IndexMap<String, Value>,
}

impl EventRecord {
    /// Creates a record with no attributes
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
        }
    }

    /// Adds (or replaces) an attribute
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// A `Quit` record
    pub fn quit() -> Self {
        Self::new(EventKind::Quit)
    }

    /// A `Click` record for `button` at `pos`
    pub fn click(button: MouseButton, pos: (i32, i32)) -> Self {
        Self::new(EventKind::Click)
            .with("button", button)
            .with("pos", pos)
            .with("mods", Modifiers::default())
    }

    /// A `KeyPress` record with no modifiers held
    pub fn key_press(key: KeyCode) -> Self {
        Self::new(EventKind::KeyPress)
            .with("key", key)
            .with("mods", Modifiers::default())
    }

    /// A `User` record
    pub fn user(code: u32) -> Self {
        Self::new(EventKind::User(code))
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Looks up an attribute that a handler depends on
    ///
    /// # Errors
    /// Returns [`Error::AttributeMismatch`] if the record lacks the attribute.
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.attributes
            .get(name)
            .ok_or_else(|| Error::AttributeMismatch {
                kind: self.kind,
                attribute: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none(self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// Key code (the subset the bundled backends can report)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Common keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Other
    Other,
}

impl KeyCode {
    /// Maps a printable character to its key, ignoring case
    pub fn from_char(c: char) -> Self {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::A,
            KeyCode::B,
            KeyCode::C,
            KeyCode::D,
            KeyCode::E,
            KeyCode::F,
            KeyCode::G,
            KeyCode::H,
            KeyCode::I,
            KeyCode::J,
            KeyCode::K,
            KeyCode::L,
            KeyCode::M,
            KeyCode::N,
            KeyCode::O,
            KeyCode::P,
            KeyCode::Q,
            KeyCode::R,
            KeyCode::S,
            KeyCode::T,
            KeyCode::U,
            KeyCode::V,
            KeyCode::W,
            KeyCode::X,
            KeyCode::Y,
            KeyCode::Z,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Num0,
            KeyCode::Num1,
            KeyCode::Num2,
            KeyCode::Num3,
            KeyCode::Num4,
            KeyCode::Num5,
            KeyCode::Num6,
            KeyCode::Num7,
            KeyCode::Num8,
            KeyCode::Num9,
        ];

        match c {
            ' ' => KeyCode::Space,
            'a'..='z' => LETTERS[(c as u8 - b'a') as usize],
            'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
            '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
            _ => KeyCode::Other,
        }
    }

    /// Maps a function key number (1-12)
    pub fn function(n: u8) -> Self {
        match n {
            1 => KeyCode::F1,
            2 => KeyCode::F2,
            3 => KeyCode::F3,
            4 => KeyCode::F4,
            5 => KeyCode::F5,
            6 => KeyCode::F6,
            7 => KeyCode::F7,
            8 => KeyCode::F8,
            9 => KeyCode::F9,
            10 => KeyCode::F10,
            11 => KeyCode::F11,
            12 => KeyCode::F12,
            _ => KeyCode::Other,
        }
    }
}

/// Convert from crossterm key code
impl From<crossterm::event::KeyCode> for KeyCode {
    fn from(key: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode as CK;
        match key {
            CK::Char(c) => Self::from_char(c),
            CK::Enter => Self::Enter,
            CK::Esc => Self::Escape,
            CK::Backspace => Self::Backspace,
            CK::Tab | CK::BackTab => Self::Tab,
            CK::Delete => Self::Delete,
            CK::Home => Self::Home,
            CK::End => Self::End,
            CK::PageUp => Self::PageUp,
            CK::PageDown => Self::PageDown,
            CK::F(n) => Self::function(n),
            CK::Left => Self::Left,
            CK::Right => Self::Right,
            CK::Up => Self::Up,
            CK::Down => Self::Down,
            _ => Self::Other,
        }
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(button: crossterm::event::MouseButton) -> Self {
        match button {
            crossterm::event::MouseButton::Left => Self::Left,
            crossterm::event::MouseButton::Right => Self::Right,
            crossterm::event::MouseButton::Middle => Self::Middle,
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as KM;
        Self {
            shift: mods.contains(KM::SHIFT),
            ctrl: mods.contains(KM::CONTROL),
            alt: mods.contains(KM::ALT),
            meta: mods.contains(KM::SUPER) || mods.contains(KM::META),
        }
    }
}
