mod bitmap;
mod event;
pub mod font;
mod panel;
pub mod widget;

use glam::IVec2;

pub use bitmap::{colors, Bitmap};
pub use event::{Event, Key, Modifiers};
pub use font::{Font, FontRef, GlyphFont};
pub use glam;
pub use palette;
pub use panel::{Panel, WidgetId};
pub use widget::{Button, Input, Label, Surface, Toggle, View, Widget, WidgetKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PointerState {
    #[default]
    None,
    Over,
    Press,
}

impl PointerState {
    pub fn from_poll(over: bool, primary_pressed: bool) -> Self {
        match (over, primary_pressed) {
            (false, _) => PointerState::None,
            (true, false) => PointerState::Over,
            (true, true) => PointerState::Press,
        }
    }
}

/// Integer pixel rectangle. Containment is half-open on both axes.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Rect {
    pub position: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            position: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }
    pub fn from_size(size: IVec2) -> Self {
        Rect {
            position: IVec2::ZERO,
            size,
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }
    pub fn y(&self) -> i32 {
        self.position.y
    }
    pub fn width(&self) -> i32 {
        self.size.x
    }
    pub fn height(&self) -> i32 {
        self.size.y
    }
    pub fn max(&self) -> IVec2 {
        self.position.saturating_add(self.size)
    }

    pub fn contains(&self, point: IVec2) -> bool {
        let max = self.max();
        point.x >= self.position.x
            && point.x < max.x
            && point.y >= self.position.y
            && point.y < max.y
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let min = self.position.max(other.position);
        let max = self.max().min(other.max());
        if max.x > min.x && max.y > min.y {
            Some(Rect {
                position: min,
                size: max - min,
            })
        } else {
            None
        }
    }

    pub fn shrink(&self, amount: i32) -> Rect {
        Rect {
            position: self.position + IVec2::splat(amount),
            size: self.size - IVec2::splat(amount * 2),
        }
    }
}
