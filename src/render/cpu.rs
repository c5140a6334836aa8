use std::sync::Arc;

use crate::{
    assets::{decode::DecodedImage, fetch::CardAssets},
    compose::plan::{CardPlan, DrawCmd, DrawOp, ImageSlotKind},
    foundation::{
        core::{Affine, BezPath, Point, Rect},
        error::{CardError, CardResult},
    },
    render::{FrameRGBA, shadow::shadow_mask},
    text::fonts::Typesetter,
};

/// Paint `plan` onto a fresh surface. Stateless: the same inputs always give the same pixels.
pub fn rasterize<T: Typesetter + ?Sized>(
    plan: &CardPlan,
    assets: &CardAssets,
    typesetter: &T,
) -> CardResult<FrameRGBA> {
    let width: u16 = plan
        .canvas
        .width
        .try_into()
        .map_err(|_| CardError::render("canvas width exceeds u16"))?;
    let height: u16 = plan
        .canvas
        .height
        .try_into()
        .map_err(|_| CardError::render("canvas height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    for cmd in &plan.commands {
        draw_cmd(&mut ctx, cmd, assets, typesetter)?;
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(FrameRGBA {
        width: plan.canvas.width,
        height: plan.canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn draw_cmd<T: Typesetter + ?Sized>(
    ctx: &mut vello_cpu::RenderContext,
    cmd: &DrawCmd,
    assets: &CardAssets,
    typesetter: &T,
) -> CardResult<()> {
    match &cmd.op {
        DrawOp::Fill {
            path,
            color,
            transform,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_path(&bezpath_to_cpu(path));
            Ok(())
        }
        DrawOp::Shadow {
            rect,
            shadow,
            transform,
        } => {
            let (w, h) = slot_size(*rect)?;
            let mask = shadow_mask(w, h, shadow)?;
            let m = f64::from(mask.margin);
            let paint = image_paint(&mask.rgba8_premul, mask.width, mask.height)?;

            // The offset is applied after rotation, like a canvas shadow.
            let placed = Affine::translate(shadow.offset)
                * *transform
                * Affine::translate((rect.x0 - m, rect.y0 - m));
            ctx.set_transform(affine_to_cpu(placed));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(mask.width),
                f64::from(mask.height),
            ));
            Ok(())
        }
        DrawOp::Image {
            slot,
            rect,
            transform,
        } => {
            let decoded = slot_image(assets, *slot)?;
            let (w, h) = slot_size(*rect)?;
            let fitted = decoded.resized(w, h)?;
            let paint = image_paint(&fitted.rgba8_premul, fitted.width, fitted.height)?;

            let placed = *transform * Affine::translate((rect.x0, rect.y0));
            ctx.set_transform(affine_to_cpu(placed));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));
            Ok(())
        }
        DrawOp::Text {
            text,
            style,
            origin,
        } => typesetter.fill_text(ctx, text, style, *origin),
    }
}

fn slot_image(assets: &CardAssets, slot: ImageSlotKind) -> CardResult<&DecodedImage> {
    let img = match slot {
        ImageSlotKind::Cover => assets.cover.as_ref(),
        ImageSlotKind::Photo => assets.photo.as_ref(),
    };
    img.ok_or_else(|| CardError::render(format!("no decoded image for {slot:?} slot")))
}

fn slot_size(rect: Rect) -> CardResult<(u32, u32)> {
    let w = rect.width().round();
    let h = rect.height().round();
    if !(w >= 1.0 && h >= 1.0 && w <= f64::from(u16::MAX) && h <= f64::from(u16::MAX)) {
        return Err(CardError::render(format!(
            "image slot size {w}x{h} out of range"
        )));
    }
    Ok((w as u32, h as u32))
}

fn image_paint(rgba8_premul: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
