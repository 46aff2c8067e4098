use std::borrow::Cow;

use glam::IVec2;

use crate::{
    colors,
    font::FontRef,
    widget::{View, WidgetBase},
    Bitmap, Event, Key, Modifiers, Rect,
};

pub struct Input {
    base: WidgetBase,
    font: FontRef,
    width: u32,
    height: u32,
    max_chars: usize,
    text: String,
    cursor: usize,
    focused: bool,
    bitmap: Bitmap,
}

impl Input {
    pub fn new(position: IVec2, width: u32, max_chars: usize, font: FontRef) -> Self {
        let height = font.line_height();
        let mut base = WidgetBase::new(position);
        base.set_size(IVec2::new(width as i32, height as i32));
        let mut input = Input {
            base,
            font,
            width,
            height,
            max_chars,
            text: String::new(),
            cursor: 0,
            focused: false,
            bitmap: Bitmap::default(),
        };
        input.redraw();
        input
    }

    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(self.max_chars).collect();
        self.clamp_cursor();
        self.redraw();
    }
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.clamp_cursor();
    }

    pub fn focused(&self) -> bool {
        self.focused
    }
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            log::debug!("input at {} focused: {}", self.base.anchor(), focused);
        }
        self.focused = focused;
    }

    // Overflow past max_chars is cut from the tail.
    pub fn insert(&mut self, text: &str) {
        let mut edited = self.text.clone();
        edited.insert_str(self.byte_offset(self.cursor), text);
        let cursor = (self.cursor + text.chars().count()).min(self.max_chars);
        self.set_text(&edited);
        self.set_cursor(cursor);
    }
    pub fn delete_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut edited = self.text.clone();
        edited.replace_range(self.byte_offset(self.cursor - 1)..self.byte_offset(self.cursor), "");
        let cursor = self.cursor - 1;
        self.set_text(&edited);
        self.set_cursor(cursor);
    }
    pub fn delete_after(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let mut edited = self.text.clone();
        edited.replace_range(self.byte_offset(self.cursor)..self.byte_offset(self.cursor + 1), "");
        self.set_text(&edited);
    }
    pub fn kill_to_start(&mut self) {
        let rest = self.text[self.byte_offset(self.cursor)..].to_owned();
        self.cursor = 0;
        self.set_text(&rest);
    }
    pub fn move_left(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(1));
    }
    pub fn move_right(&mut self) {
        self.set_cursor(self.cursor + 1);
    }
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }
    pub fn move_to_end(&mut self) {
        self.cursor = self.len();
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers) {
        let ctrl = modifiers.ctrl;
        match key {
            Key::Backspace => self.delete_before(),
            Key::Delete => self.delete_after(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Escape => self.set_focused(false),
            Key::Char(letter) if ctrl => match letter {
                'h' => self.delete_before(),
                'd' => self.delete_after(),
                'u' => self.kill_to_start(),
                'b' => self.move_left(),
                'f' => self.move_right(),
                'a' => self.move_to_start(),
                'e' => self.move_to_end(),
                _ => {}
            },
            _ => {}
        }
    }

    // Nearest character boundary to `x`, measured from the left edge.
    fn cursor_from_offset(&self, x: i32) -> usize {
        let mut old = 0;
        for index in 0..=self.len() {
            let width = self.font.measure_width(self.prefix(index)) as i32;
            if old <= x && x < width {
                let before_middle = (x as f32) < (width + old) as f32 / 2.0;
                return index.saturating_sub(usize::from(before_middle));
            }
            old = width;
        }
        self.len()
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
    fn prefix(&self, index: usize) -> &str {
        &self.text[..self.byte_offset(index)]
    }
    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.len());
        debug_assert!(self.len() <= self.max_chars);
    }

    fn redraw(&mut self) {
        let mut bitmap = Bitmap::filled(self.width, self.height, colors::BLACK);
        let text = self.font.render(&self.text, true, colors::WHITE, None, None);
        bitmap.blit(&text, IVec2::ZERO);
        bitmap.outline_rect(bitmap.rect(), colors::BLUE, 1);
        self.bitmap = bitmap;
    }
}

impl View for Input {
    fn base(&self) -> &WidgetBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        if !self.focused {
            return Cow::Borrowed(&self.bitmap);
        }
        let mut bitmap = self.bitmap.clone();
        let caret = self.font.measure_width(self.prefix(self.cursor)) as i32;
        bitmap.fill_rect(Rect::new(caret, 0, 1, self.height as i32), colors::WHITE);
        Cow::Owned(bitmap)
    }
    fn handle_event(&mut self, event: &Event) {
        if let Event::PointerDown { position } = event {
            let inside = self.base.contains(*position);
            if inside {
                self.cursor = self.cursor_from_offset(position.x - self.base.anchor().x);
            }
            self.set_focused(inside);
        }
        if !self.focused {
            return;
        }
        match event {
            Event::TextInput { text } => self.insert(text),
            Event::KeyDown { key, modifiers } => self.handle_key(*key, *modifiers),
            _ => {}
        }
    }
}
