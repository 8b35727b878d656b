use serde::{Deserialize, Serialize};

/// A packed `0xAARRGGBB` colour, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const GREEN: Self = Self(0xFF00_FF00);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same colour with the alpha channel forced to 255
    pub const fn opaque(self) -> Self {
        Self(self.0 | 0xFF00_0000)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.red(), self.green(), self.blue(), self.alpha())
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.red(), self.green(), self.blue(), self.alpha())
    }

    pub fn from_color32(color: egui::Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Self::from_argb(a, r, g, b)
    }
}

impl Default for Argb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Colour and width shared by every in-progress and newly flattened curve.
///
/// Caps are always round and strokes always anti-aliased, so only the two
/// user-facing knobs are stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: Argb,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Argb::GREEN,
            width: 23.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(color: Argb, width: f32) -> Self {
        Self { color, width }
    }

    pub(crate) fn paint(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(self.color.to_skia());
        paint.anti_alias = true;
        paint
    }

    pub(crate) fn stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            line_cap: tiny_skia::LineCap::Round,
            line_join: tiny_skia::LineJoin::Round,
            ..Default::default()
        }
    }
}
