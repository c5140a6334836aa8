use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{CardError, CardResult},
    math::premultiply_rgba8_in_place,
};

/// Decoded raster with premultiplied RGBA8 pixels, row-major, no padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// `width * height * 4` premultiplied bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Scale to exactly `width`×`height`, ignoring aspect ratio.
    ///
    /// Resampling runs on premultiplied data so transparent edges do not bleed dark fringes.
    pub fn resized(&self, width: u32, height: u32) -> CardResult<DecodedImage> {
        if width == 0 || height == 0 {
            return Err(CardError::render("resize target must be non-empty"));
        }
        if (width, height) == (self.width, self.height) {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| CardError::render("decoded image byte length mismatch"))?;
        let out = image::imageops::resize(
            &src,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        Ok(DecodedImage {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }
}

/// Decode any raster format the `image` crate recognizes and premultiply its alpha.
pub fn decode_image(bytes: &[u8]) -> CardResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::render("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
