use glam::IVec2;
use palette::{LinSrgba, Mix, Srgba};

use crate::Rect;

pub mod colors {
    use palette::LinSrgba;

    pub const TRANSPARENT: LinSrgba = LinSrgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: LinSrgba = LinSrgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: LinSrgba = LinSrgba::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: LinSrgba = LinSrgba::new(1.0, 0.0, 0.0, 1.0);
    pub const BLUE: LinSrgba = LinSrgba::new(0.0, 0.0, 1.0, 1.0);
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<LinSrgba>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, colors::TRANSPARENT)
    }
    pub fn filled(width: u32, height: u32, color: LinSrgba) -> Self {
        Bitmap {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<LinSrgba>) -> Option<Self> {
        if pixels.len() == width as usize * height as usize {
            Some(Bitmap {
                width,
                height,
                pixels,
            })
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
    pub fn pixels(&self) -> &[LinSrgba] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<LinSrgba> {
        self.index(x, y).map(|index| self.pixels[index])
    }
    pub fn set_pixel(&mut self, x: i32, y: i32, color: LinSrgba) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: LinSrgba) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = over(self.pixels[index], color);
        }
    }

    pub fn fill(&mut self, color: LinSrgba) {
        self.pixels.fill(color);
    }
    pub fn fill_rect(&mut self, rect: Rect, color: LinSrgba) {
        let Some(rect) = rect.intersect(&self.rect()) else {
            return;
        };
        let width = self.width as usize;
        for y in rect.y()..rect.max().y {
            let row = y as usize * width;
            self.pixels[row + rect.x() as usize..row + rect.max().x as usize].fill(color);
        }
    }
    /// Draws a border of `line_width` pixels inside `rect`.
    pub fn outline_rect(&mut self, rect: Rect, color: LinSrgba, line_width: u32) {
        let line = (line_width as i32)
            .min(rect.width() / 2 + rect.width() % 2)
            .min(rect.height() / 2 + rect.height() % 2);
        if line <= 0 {
            return;
        }
        // Top, bottom, then the sides between them.
        self.fill_rect(Rect::new(rect.x(), rect.y(), rect.width(), line), color);
        self.fill_rect(
            Rect::new(rect.x(), rect.max().y - line, rect.width(), line),
            color,
        );
        let side_height = rect.height() - line * 2;
        self.fill_rect(Rect::new(rect.x(), rect.y() + line, line, side_height), color);
        self.fill_rect(
            Rect::new(rect.max().x - line, rect.y() + line, line, side_height),
            color,
        );
    }

    pub fn blit(&mut self, source: &Bitmap, position: IVec2) {
        let dest = Rect {
            position,
            size: source.size(),
        };
        let Some(clipped) = dest.intersect(&self.rect()) else {
            return;
        };
        let (width, source_width) = (self.width as usize, source.width as usize);
        for y in clipped.y()..clipped.max().y {
            let row = y as usize * width;
            let source_row = (y - position.y) as usize * source_width;
            for x in clipped.x()..clipped.max().x {
                let src = source.pixels[source_row + (x - position.x) as usize];
                let index = row + x as usize;
                self.pixels[index] = over(self.pixels[index], src);
            }
        }
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            let color: Srgba<u8> = Srgba::from_linear(*pixel);
            bytes.extend_from_slice(&[color.red, color.green, color.blue, color.alpha]);
        }
        bytes
    }
}

fn over(dest: LinSrgba, src: LinSrgba) -> LinSrgba {
    if src.alpha >= 1.0 {
        return src;
    }
    if src.alpha <= 0.0 {
        return dest;
    }
    let alpha = src.alpha + dest.alpha * (1.0 - src.alpha);
    let color = if dest.alpha <= 0.0 {
        src.color
    } else {
        dest.color.mix(src.color, src.alpha / alpha)
    };
    LinSrgba::new(color.red, color.green, color.blue, alpha)
}
