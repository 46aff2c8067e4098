use glam::{IVec2, Vec2};
use sash::{Event, Key, Modifiers};

pub use miniquad::{KeyCode, KeyMods};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

impl TryFrom<miniquad::MouseButton> for MouseButton {
    type Error = ();
    fn try_from(value: miniquad::MouseButton) -> Result<Self, Self::Error> {
        match value {
            miniquad::MouseButton::Left => Ok(MouseButton::Left),
            miniquad::MouseButton::Middle => Ok(MouseButton::Middle),
            miniquad::MouseButton::Right => Ok(MouseButton::Right),
            miniquad::MouseButton::Unknown => Err(()),
        }
    }
}

/// Pointer state polled once per frame, in window pixels.
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    position: IVec2,
    buttons: [bool; 3],
}

impl Pointer {
    pub fn position(&self) -> IVec2 {
        self.position
    }
    /// Held buttons ordered left, middle, right.
    pub fn pressed(&self) -> &[bool] {
        &self.buttons
    }
    pub fn primary(&self) -> bool {
        self.buttons[0]
    }

    pub(crate) fn moved(&mut self, position: Vec2) {
        self.position = position.floor().as_ivec2();
    }
    pub(crate) fn button(&mut self, button: MouseButton, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }
}

pub fn modifiers(mods: KeyMods) -> Modifiers {
    Modifiers {
        ctrl: mods.ctrl,
        shift: mods.shift,
        alt: mods.alt,
    }
}

pub fn key(keycode: KeyCode) -> Key {
    match keycode {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::KpEnter => Key::Enter,
        KeyCode::Space => Key::Char(' '),
        _ => letter(keycode).map_or(Key::Other, Key::Char),
    }
}

fn letter(keycode: KeyCode) -> Option<char> {
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
    LETTERS
        .iter()
        .position(|&candidate| candidate == keycode)
        .map(|index| (b'a' + index as u8) as char)
}

/// Text typed by the user, or `None` for control characters and ctrl chords,
/// which arrive separately as key events.
pub fn text_input(character: char, mods: KeyMods) -> Option<Event> {
    if character.is_control() || mods.ctrl {
        None
    } else {
        Some(Event::TextInput {
            text: character.to_string(),
        })
    }
}
