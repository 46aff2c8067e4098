use std::borrow::Cow;

use glam::IVec2;
use palette::LinSrgba;

use crate::{
    colors,
    font::FontRef,
    widget::{View, WidgetBase},
    Bitmap,
};

pub struct Surface {
    base: WidgetBase,
    bitmap: Bitmap,
}

impl Surface {
    pub fn new(position: IVec2, bitmap: Bitmap) -> Self {
        let mut base = WidgetBase::new(position);
        base.set_size(bitmap.size());
        Surface { base, bitmap }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
    pub fn set_bitmap(&mut self, bitmap: Bitmap) {
        self.base.set_size(bitmap.size());
        self.bitmap = bitmap;
    }
}

impl View for Surface {
    fn base(&self) -> &WidgetBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        Cow::Borrowed(&self.bitmap)
    }
}

pub struct Label {
    base: WidgetBase,
    font: FontRef,
    text: String,
    color: LinSrgba,
    background: Option<LinSrgba>,
    wrap_width: Option<u32>,
    bitmap: Bitmap,
}

impl Label {
    pub fn new(position: IVec2, text: &str, font: FontRef) -> Self {
        Self::with_style(position, text, font, None, None)
    }
    pub fn with_style(
        position: IVec2,
        text: &str,
        font: FontRef,
        background: Option<LinSrgba>,
        wrap_width: Option<u32>,
    ) -> Self {
        let mut label = Label {
            base: WidgetBase::new(position),
            font,
            text: String::new(),
            color: colors::WHITE,
            background,
            wrap_width,
            bitmap: Bitmap::default(),
        };
        label.set_text(text);
        label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.redraw();
    }
    pub fn set_color(&mut self, color: LinSrgba) {
        self.color = color;
        self.redraw();
    }

    fn redraw(&mut self) {
        self.bitmap = self.font.render(
            &self.text,
            true,
            self.color,
            self.background,
            self.wrap_width,
        );
        self.base.set_size(self.bitmap.size());
    }
}

impl View for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }
    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }
    fn render(&self) -> Cow<'_, Bitmap> {
        Cow::Borrowed(&self.bitmap)
    }
}
