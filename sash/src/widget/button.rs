use std::borrow::Cow;

use glam::IVec2;
use pane::{impl_add_signal_listener, Signal};

use crate::{
    colors,
    font::FontRef,
    widget::{primary_pressed, View, WidgetBase},
    Bitmap, Event, PointerState,
};

pub struct Button {
    base: WidgetBase,
    font: FontRef,
    text: String,
    state: PointerState,
    bitmaps: [Bitmap; 3],
    pressed: Signal<()>,
}

impl Button {
    pub fn new(position: IVec2, text: &str, font: FontRef) -> Self {
        let mut button = Button {
            base: WidgetBase::new(position),
            font,
            text: String::new(),
            state: PointerState::None,
            bitmaps: Default::default(),
            pressed: Signal::new(),
        };
        button.set_text(text);
        button
    }

    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        let label = self.font.render(text, true, colors::WHITE, None, None);
        let (width, height) = (label.width(), label.height());

        let normal = Bitmap::filled(width, height, colors::BLUE);
        let over = Bitmap::filled(width, height, colors::RED);
        let mut press = Bitmap::filled(width, height, colors::BLACK);
        press.outline_rect(press.rect(), colors::RED, 2);
        self.bitmaps = [normal, over, press];
        for bitmap in self.bitmaps.iter_mut() {
            bitmap.blit(&label, IVec2::ZERO);
        }
        self.base.set_size(label.size());
    }

    pub fn pointer_state(&self) -> PointerState {
        self.state
    }
}

impl_add_signal_listener!(Button, pressed, (), add_pressed_listener);

impl View for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        Cow::Borrowed(&self.bitmaps[self.state as usize])
    }
    fn handle_event(&mut self, event: &Event) {
        if let Event::PointerDown { position } = event {
            if self.base.contains(*position) {
                self.pressed.emit(&());
            }
        }
    }
    fn update(&mut self, position: IVec2, pressed: &[bool]) {
        self.state =
            PointerState::from_poll(self.base.contains(position), primary_pressed(pressed));
    }
}

pub struct Toggle {
    base: WidgetBase,
    font: FontRef,
    text: String,
    state: bool,
    hovered: bool,
    bitmaps: [Bitmap; 4],
    changed: Signal<bool>,
}

impl Toggle {
    pub const DEFAULT_TEXT: &'static str = " X ";

    pub fn new(position: IVec2, font: FontRef) -> Self {
        Self::with_text(position, Self::DEFAULT_TEXT, font)
    }
    pub fn with_text(position: IVec2, text: &str, font: FontRef) -> Self {
        let mut toggle = Toggle {
            base: WidgetBase::new(position),
            font,
            text: String::new(),
            state: false,
            hovered: false,
            bitmaps: Default::default(),
            changed: Signal::new(),
        };
        toggle.set_text(text);
        toggle
    }

    pub fn state(&self) -> bool {
        self.state
    }
    /// Sets the state without firing `changed`.
    pub fn set_state(&mut self, state: bool) {
        self.state = state;
    }
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        let label = self.font.render(text, true, colors::WHITE, None, None);
        let (width, height) = (label.width(), label.height());

        // The "off" looks are outline only and carry no text.
        let mut off = Bitmap::filled(width, height, colors::BLACK);
        off.outline_rect(off.rect(), colors::BLUE, 2);
        let mut off_over = Bitmap::filled(width, height, colors::BLACK);
        off_over.outline_rect(off_over.rect(), colors::RED, 2);
        let mut on = Bitmap::filled(width, height, colors::BLUE);
        on.blit(&label, IVec2::ZERO);
        let mut on_over = Bitmap::filled(width, height, colors::RED);
        on_over.blit(&label, IVec2::ZERO);

        self.bitmaps = [off, off_over, on, on_over];
        self.base.set_size(label.size());
    }
}

impl_add_signal_listener!(Toggle, changed, bool, add_changed_listener);

impl View for Toggle {
    fn base(&self) -> &WidgetBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        Cow::Borrowed(&self.bitmaps[2 * usize::from(self.state) + usize::from(self.hovered)])
    }
    fn handle_event(&mut self, event: &Event) {
        if let Event::PointerDown { position } = event {
            if self.base.contains(*position) {
                self.state = !self.state;
                self.changed.emit(&self.state);
            }
        }
    }
    fn update(&mut self, position: IVec2, _pressed: &[bool]) {
        self.hovered = self.base.contains(position);
    }
}
