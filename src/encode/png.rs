use std::io::Cursor;

use crate::{
    foundation::{
        error::{CardError, CardResult},
        math::unpremultiply_rgba8_in_place,
    },
    render::FrameRGBA,
};

const FILE_SUFFIX: &str = "-rndm.png";
const EMPTY_SLUG: &str = "untitled";

/// A finished card: the file name to save under and the complete PNG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedCard {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Serialize `frame` as an 8-bit RGBA PNG with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> CardResult<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CardError::encode("frame must be non-empty"));
    }
    let expected = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CardError::encode("frame size overflow"))?;
    if frame.data.len() != expected {
        return Err(CardError::encode(format!(
            "frame data is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| CardError::encode("frame buffer does not match its dimensions"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| CardError::encode(e.to_string()))?;
    Ok(out)
}

/// Filesystem-safe slug: lowercase, every run of characters outside `[a-z0-9]` becomes one
/// dash, no leading or trailing dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `{slug}-rndm.png`; titles with nothing sluggable fall back to `untitled`.
pub fn card_file_name(title: &str) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() { EMPTY_SLUG } else { &slug };
    format!("{slug}{FILE_SUFFIX}")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
