//! Text measurement and rasterization.
//!
//! Widgets only see the [`Font`] trait through a shared [`FontRef`]. Fonts are
//! created once by the host and handed to every widget that draws text.

use std::rc::Rc;

use glam::IVec2;
use glyph_brush::ab_glyph::{point, Font as _, FontArc, GlyphId, PxScale, ScaleFont as _};
use palette::LinSrgba;

use crate::{Bitmap, Rect};

pub type FontRef = Rc<dyn Font>;

pub trait Font {
    fn measure_width(&self, text: &str) -> u32;
    fn line_height(&self) -> u32;
    /// Rasterizes one line of text onto a transparent bitmap of
    /// `measure_width(text) x line_height()`.
    fn render_line(&self, text: &str, antialias: bool, color: LinSrgba) -> Bitmap;

    /// Renders `text`, wrapping to `wrap_width` when given. Lines are stacked
    /// `line_height` apart and the bitmap is as wide as the widest line.
    fn render(
        &self,
        text: &str,
        antialias: bool,
        color: LinSrgba,
        background: Option<LinSrgba>,
        wrap_width: Option<u32>,
    ) -> Bitmap {
        let lines = wrap_lines(self, text, wrap_width);
        let line_height = self.line_height();
        let width = lines
            .iter()
            .map(|line| self.measure_width(line))
            .max()
            .unwrap_or(0);
        let height = line_height * lines.len() as u32;
        let mut bitmap = match background {
            Some(background) => Bitmap::filled(width, height, background),
            None => Bitmap::new(width, height),
        };
        for (row, line) in lines.iter().enumerate() {
            let rendered = self.render_line(line, antialias, color);
            bitmap.blit(&rendered, IVec2::new(0, (row as u32 * line_height) as i32));
        }
        bitmap
    }
}

/// Splits `text` into rendered lines. Explicit newlines always break; with a
/// nonzero `wrap_width` words are packed greedily. A single word wider than
/// `wrap_width` gets a line of its own and overflows.
pub fn wrap_lines<F: Font + ?Sized>(font: &F, text: &str, wrap_width: Option<u32>) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max_width) = wrap_width.filter(|&width| width > 0) else {
            lines.push(paragraph.to_owned());
            continue;
        };
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if font.measure_width(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_owned()));
            }
        }
        lines.push(line);
    }
    lines
}

#[derive(Clone)]
pub struct GlyphFont {
    font: FontArc,
    scale: PxScale,
}

impl GlyphFont {
    pub fn new(font: FontArc, px_size: f32) -> Self {
        GlyphFont {
            font,
            scale: PxScale::from(px_size),
        }
    }

    /// Calls `f` with each glyph and its pen x position.
    fn layout<F>(&self, text: &str, mut f: F) -> f32
    where
        F: FnMut(GlyphId, f32),
    {
        let font = self.font.as_scaled(self.scale);
        let mut caret = 0.0;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = font.glyph_id(c);
            if let Some(previous) = previous {
                caret += font.kern(previous, id);
            }
            f(id, caret);
            caret += font.h_advance(id);
            previous = Some(id);
        }
        caret
    }
}

impl Font for GlyphFont {
    fn measure_width(&self, text: &str) -> u32 {
        self.layout(text, |_, _| {}).ceil() as u32
    }
    fn line_height(&self) -> u32 {
        self.font.as_scaled(self.scale).height().ceil() as u32
    }
    fn render_line(&self, text: &str, antialias: bool, color: LinSrgba) -> Bitmap {
        let mut bitmap = Bitmap::new(self.measure_width(text), self.line_height());
        let ascent = self.font.as_scaled(self.scale).ascent();
        self.layout(text, |id, caret| {
            let glyph = id.with_scale_and_position(self.scale, point(caret, ascent));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                return;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let coverage = match antialias {
                    true => coverage.clamp(0.0, 1.0),
                    false if coverage >= 0.5 => 1.0,
                    false => 0.0,
                };
                if coverage > 0.0 {
                    bitmap.blend_pixel(
                        bounds.min.x as i32 + x as i32,
                        bounds.min.y as i32 + y as i32,
                        LinSrgba::new(color.red, color.green, color.blue, color.alpha * coverage),
                    );
                }
            });
        });
        bitmap
    }
}

/// Fixed-advance font that draws every non-whitespace character as a solid
/// block. Needs no font file, so it also serves headless hosts and tests.
#[derive(Clone, Copy, Debug)]
pub struct BlockFont {
    pub advance: u32,
    pub line_height: u32,
}

impl Default for BlockFont {
    fn default() -> Self {
        BlockFont {
            advance: 8,
            line_height: 16,
        }
    }
}

impl Font for BlockFont {
    fn measure_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance
    }
    fn line_height(&self) -> u32 {
        self.line_height
    }
    fn render_line(&self, text: &str, _antialias: bool, color: LinSrgba) -> Bitmap {
        let mut bitmap = Bitmap::new(self.measure_width(text), self.line_height);
        let advance = self.advance as i32;
        for (index, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let cell = Rect::new(index as i32 * advance, 0, advance, self.line_height as i32);
            bitmap.fill_rect(cell.shrink(1), color);
        }
        bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    #[test]
    fn block_font_metrics() {
        let font = BlockFont::default();
        assert_eq!(font.measure_width("héllo"), 40);
        assert_eq!(font.measure_width(""), 0);
        assert_eq!(font.line_height(), 16);
    }

    #[test]
    fn wrap_packs_words_greedily() {
        let font = BlockFont::default();
        let lines = wrap_lines(&font, "one two three four", Some(80));
        assert_eq!(lines, vec!["one two", "three four"]);
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        let font = BlockFont::default();
        assert_eq!(wrap_lines(&font, "a\nb", None), vec!["a", "b"]);
        assert_eq!(wrap_lines(&font, "a b", Some(0)), vec!["a b"]);
    }

    #[test]
    fn long_word_overflows_on_its_own_line() {
        let font = BlockFont::default();
        let lines = wrap_lines(&font, "hi extraordinary", Some(40));
        assert_eq!(lines, vec!["hi", "extraordinary"]);
    }

    #[test]
    fn render_stacks_lines_over_background() {
        let font = BlockFont::default();
        let bitmap = font.render("ab c", true, colors::WHITE, Some(colors::BLUE), Some(16));
        assert_eq!(bitmap.width(), 16);
        assert_eq!(bitmap.height(), 32);
        // glyph cell interior, then the one-pixel gap around it
        assert_eq!(bitmap.pixel(4, 8), Some(colors::WHITE));
        assert_eq!(bitmap.pixel(0, 0), Some(colors::BLUE));
        assert_eq!(bitmap.pixel(12, 24), Some(colors::BLUE));
        assert_eq!(bitmap.pixel(4, 24), Some(colors::WHITE));
    }

    const DEJAVU_MONO: &[u8] = include_bytes!("../test-assets/DejaVuSansMono.ttf");

    fn glyph_font() -> GlyphFont {
        GlyphFont::new(FontArc::try_from_slice(DEJAVU_MONO).unwrap(), 20.0)
    }

    #[test]
    fn glyph_line_matches_metrics() {
        let font = glyph_font();
        assert!(font.line_height() >= 20);
        for text in ["Hello, world", "ij", "W"] {
            let bitmap = font.render_line(text, true, colors::WHITE);
            assert_eq!(bitmap.width(), font.measure_width(text));
            assert_eq!(bitmap.height(), font.line_height());
        }
        let empty = font.render_line("", true, colors::WHITE);
        assert_eq!((empty.width(), empty.height()), (0, font.line_height()));
    }

    #[test]
    fn glyph_coverage_is_thresholded_without_antialias() {
        let font = glyph_font();
        let aliased = font.render_line("Sphinx of quartz", false, colors::WHITE);
        assert!(aliased
            .pixels()
            .iter()
            .all(|pixel| pixel.alpha == 0.0 || pixel.alpha == 1.0));
        assert!(aliased.pixels().iter().any(|pixel| pixel.alpha == 1.0));

        let smooth = font.render_line("Sphinx of quartz", true, colors::WHITE);
        assert!(smooth
            .pixels()
            .iter()
            .any(|pixel| pixel.alpha > 0.0 && pixel.alpha < 1.0));
    }

    #[test]
    fn glyph_prefix_widths_increase() {
        let font = glyph_font();
        let text = "Wavy text, AV!";
        let widths: Vec<u32> = (0..=text.len())
            .map(|end| font.measure_width(&text[..end]))
            .collect();
        assert_eq!(widths[0], 0);
        assert!(widths.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let font = BlockFont::default();
        let bitmap = font.render("", true, colors::WHITE, None, None);
        assert_eq!(bitmap.width(), 0);
        assert_eq!(bitmap.height(), 16);
    }
}
