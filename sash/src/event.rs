use glam::IVec2;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PointerDown { position: IVec2 },
    Wheel { precise_y: f32 },
    TextInput { text: String },
    KeyDown { key: Key, modifiers: Modifiers },
}

impl Event {
    pub fn pointer_down(x: i32, y: i32) -> Self {
        Event::PointerDown {
            position: IVec2::new(x, y),
        }
    }
    pub fn text(text: &str) -> Self {
        Event::TextInput {
            text: text.to_owned(),
        }
    }
    pub fn key(key: Key) -> Self {
        Event::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }
    pub fn ctrl(letter: char) -> Self {
        Event::KeyDown {
            key: Key::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Escape,
    Enter,
    /// Printable key, lowercase for letters.
    Char(char),
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };
}
