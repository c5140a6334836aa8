pub(crate) mod cpu;
pub(crate) mod shadow;

/// A rendered card surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major RGBA8.
    pub data: Vec<u8>,
    /// Whether `data` is alpha-premultiplied.
    pub premultiplied: bool,
}
