use crate::{
    foundation::error::{CardError, CardResult},
    layout::planner::Shadow,
};

/// Pre-blurred drop shadow for an axis-aligned `width`×`height` box.
///
/// The mask extends `margin` pixels past the box on every side; pixel `(margin, margin)` lines
/// up with the box's top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ShadowMask {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub rgba8_premul: Vec<u8>,
}

/// Build the blurred mask for a box in the shadow's color.
///
/// A gaussian blur of a rectangle is separable, so the mask is the outer product of two
/// blurred 1D box profiles rather than a full 2D convolution.
pub(crate) fn shadow_mask(width: u32, height: u32, shadow: &Shadow) -> CardResult<ShadowMask> {
    if width == 0 || height == 0 {
        return Err(CardError::render("shadow box must be non-empty"));
    }
    if !shadow.blur.is_finite() || shadow.blur < 0.0 {
        return Err(CardError::render("shadow blur must be finite and >= 0"));
    }

    // Canvas convention: sigma is half the blur extent.
    let sigma = shadow.blur * 0.5;
    let margin = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(margin, sigma)?;

    let px = blurred_box_profile(width, margin, &kernel);
    let py = blurred_box_profile(height, margin, &kernel);
    let mw = width + 2 * margin;
    let mh = height + 2 * margin;

    let c = shadow.color;
    let mut rgba8_premul = Vec::with_capacity(mw as usize * mh as usize * 4);
    for &wy in &py {
        for &wx in &px {
            // q16 * q16 * 255 fits in u64.
            let coverage = (u64::from(wx) * u64::from(wy)) >> 16;
            let a = ((coverage * u64::from(c.a) + (1 << 15)) >> 16) as u32;
            let a = a.min(255);
            rgba8_premul.extend_from_slice(&[
                premul(c.r, a),
                premul(c.g, a),
                premul(c.b, a),
                a as u8,
            ]);
        }
    }

    Ok(ShadowMask {
        width: mw,
        height: mh,
        margin,
        rgba8_premul,
    })
}

fn premul(channel: u8, a: u32) -> u8 {
    ((u32::from(channel) * a + 127) / 255) as u8
}

/// Box indicator of `len` samples padded by `margin` zeros on each side, convolved with `kernel`.
/// Values are q16 coverage in `0..=65536`.
fn blurred_box_profile(len: u32, margin: u32, kernel: &[u32]) -> Vec<u32> {
    let n = (len + 2 * margin) as i64;
    let r = (kernel.len() / 2) as i64;
    let lo = i64::from(margin);
    let hi = lo + i64::from(len);
    (0..n)
        .map(|i| {
            let mut acc = 0u64;
            for (k, &w) in kernel.iter().enumerate() {
                let j = i + k as i64 - r;
                if (lo..hi).contains(&j) {
                    acc += u64::from(w);
                }
            }
            acc.min(65536) as u32
        })
        .collect()
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> CardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CardError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
