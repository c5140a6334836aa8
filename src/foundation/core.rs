pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The only canvas a share card is ever rendered on.
    pub const CARD: Canvas = Canvas {
        width: 1080,
        height: 1080,
    };

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Horizontal center line.
    pub fn center_x(self) -> f64 {
        f64::from(self.width) * 0.5
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn from_rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }
}

/// Rotation by `degrees` about the center of `rect`.
pub fn rotate_about_center(rect: Rect, degrees: f64) -> Affine {
    if degrees == 0.0 {
        return Affine::IDENTITY;
    }
    Affine::rotate_about(degrees.to_radians(), rect.center())
}

/// The four corners of `rect` after applying `transform`, clockwise from top-left.
pub fn transformed_corners(rect: Rect, transform: Affine) -> [Point; 4] {
    [
        transform * Point::new(rect.x0, rect.y0),
        transform * Point::new(rect.x1, rect.y0),
        transform * Point::new(rect.x1, rect.y1),
        transform * Point::new(rect.x0, rect.y1),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
