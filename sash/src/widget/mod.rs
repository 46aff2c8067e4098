mod button;
mod input;
mod label;

pub use button::{Button, Toggle};
pub use input::Input;
pub use label::{Label, Surface};

use std::borrow::Cow;

use glam::IVec2;

use crate::{Bitmap, Event, Rect};

// rect.position is always anchor + (0, scroll)
#[derive(Clone, Debug)]
pub struct WidgetBase {
    anchor: IVec2,
    scroll: i32,
    rect: Rect,
}

impl WidgetBase {
    pub fn new(anchor: IVec2) -> Self {
        WidgetBase {
            anchor,
            scroll: 0,
            rect: Rect {
                position: anchor,
                size: IVec2::ZERO,
            },
        }
    }

    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }
    pub fn scroll(&self) -> i32 {
        self.scroll
    }
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.anchor.x, self.anchor.y.saturating_add(self.scroll))
    }
    pub fn rect(&self) -> Rect {
        self.rect
    }
    pub fn contains(&self, point: IVec2) -> bool {
        self.rect.contains(point)
    }

    pub fn set_scroll(&mut self, scroll: i32) {
        self.scroll = scroll;
        self.rect.position = self.position();
    }
    pub(crate) fn set_size(&mut self, size: IVec2) {
        self.rect.size = size;
    }
}

pub(crate) fn primary_pressed(pressed: &[bool]) -> bool {
    pressed.first().copied().unwrap_or(false)
}

pub trait View {
    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    fn render(&self) -> Cow<'_, Bitmap>;
    fn handle_event(&mut self, _event: &Event) {}
    /// Per-frame pointer poll. `pressed[0]` is the primary button.
    fn update(&mut self, _position: IVec2, _pressed: &[bool]) {}

    fn position(&self) -> IVec2 {
        self.base().position()
    }
    fn rect(&self) -> Rect {
        self.base().rect()
    }
    fn scroll(&self) -> i32 {
        self.base().scroll()
    }
    fn set_scroll(&mut self, scroll: i32) {
        self.base_mut().set_scroll(scroll);
    }
}

pub enum Widget {
    Surface(Surface),
    Label(Label),
    Button(Button),
    Toggle(Toggle),
    Input(Input),
}

macro_rules! dispatch {
    ($widget:expr, $inner:ident => $body:expr) => {
        match $widget {
            Widget::Surface($inner) => $body,
            Widget::Label($inner) => $body,
            Widget::Button($inner) => $body,
            Widget::Toggle($inner) => $body,
            Widget::Input($inner) => $body,
        }
    };
}

impl View for Widget {
    fn base(&self) -> &WidgetBase {
        dispatch!(self, widget => widget.base())
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        dispatch!(self, widget => widget.base_mut())
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        dispatch!(self, widget => widget.render())
    }
    fn handle_event(&mut self, event: &Event) {
        dispatch!(self, widget => widget.handle_event(event))
    }
    fn update(&mut self, position: IVec2, pressed: &[bool]) {
        dispatch!(self, widget => widget.update(position, pressed))
    }
}

impl Widget {
    pub fn downcast_ref<W: WidgetKind>(&self) -> Option<&W> {
        W::from_widget(self)
    }
    pub fn downcast_mut<W: WidgetKind>(&mut self) -> Option<&mut W> {
        W::from_widget_mut(self)
    }
}

pub trait WidgetKind: View + Into<Widget> {
    fn from_widget(widget: &Widget) -> Option<&Self>;
    fn from_widget_mut(widget: &mut Widget) -> Option<&mut Self>;
}

macro_rules! impl_widget_kind {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Widget {
                fn from(widget: $variant) -> Self {
                    Widget::$variant(widget)
                }
            }
            impl WidgetKind for $variant {
                fn from_widget(widget: &Widget) -> Option<&Self> {
                    match widget {
                        Widget::$variant(widget) => Some(widget),
                        _ => None,
                    }
                }
                fn from_widget_mut(widget: &mut Widget) -> Option<&mut Self> {
                    match widget {
                        Widget::$variant(widget) => Some(widget),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_widget_kind!(Surface, Label, Button, Toggle, Input);

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::font::{BlockFont, FontRef};

    pub(crate) fn block_font() -> FontRef {
        Rc::new(BlockFont::default())
    }

    #[test]
    fn scroll_moves_rect_with_position() {
        let mut base = WidgetBase::new(IVec2::new(5, 40));
        base.set_size(IVec2::new(10, 10));
        base.set_scroll(-25);
        assert_eq!(base.position(), IVec2::new(5, 15));
        assert_eq!(base.rect(), Rect::new(5, 15, 10, 10));
        assert_eq!(base.anchor(), IVec2::new(5, 40));
        assert!(base.contains(IVec2::new(5, 15)));
        assert!(!base.contains(IVec2::new(5, 40)));
    }

    #[test]
    fn scroll_saturates_at_the_edge_of_the_plane() {
        let mut base = WidgetBase::new(IVec2::new(0, -5));
        base.set_size(IVec2::new(8, 16));
        base.set_scroll(i32::MIN);
        assert_eq!(base.position(), IVec2::new(0, i32::MIN));
        assert!(base.contains(IVec2::new(0, i32::MIN)));

        let mut base = WidgetBase::new(IVec2::new(0, i32::MAX - 4));
        base.set_size(IVec2::new(8, 16));
        assert!(base.contains(IVec2::new(7, i32::MAX - 1)));
        assert!(!base.contains(IVec2::new(8, i32::MAX - 1)));
    }

    #[test]
    fn downcast_matches_variant() {
        let mut widget: Widget = Label::new(IVec2::ZERO, "hi", block_font()).into();
        assert!(widget.downcast_ref::<Label>().is_some());
        assert!(widget.downcast_ref::<Button>().is_none());
        widget.downcast_mut::<Label>().unwrap().set_text("bye");
        assert_eq!(widget.downcast_ref::<Label>().unwrap().text(), "bye");
    }

    #[test]
    fn enum_forwards_scroll_to_variant() {
        let mut widget: Widget = Surface::new(IVec2::new(0, 10), Bitmap::new(4, 4)).into();
        widget.set_scroll(-3);
        assert_eq!(widget.position(), IVec2::new(0, 7));
        assert_eq!(widget.rect().y(), 7);
        assert_eq!(widget.downcast_ref::<Surface>().unwrap().scroll(), -3);
    }

    #[test]
    fn missing_button_state_reads_released() {
        assert!(!primary_pressed(&[]));
        assert!(primary_pressed(&[true, false]));
    }
}
