use std::{
    borrow::Cow,
    path::Path,
    sync::{Mutex, PoisonError},
};

use anyhow::Context;

use crate::foundation::{
    core::{Point, Rgba8},
    error::{CardError, CardResult},
};

/// The two weights a card uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Body text.
    Regular,
    /// Title, brand mark and type label.
    Bold,
}

/// Font size, weight and fill color for one run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Face to use.
    pub weight: FontWeight,
    /// Fill color.
    pub color: Rgba8,
}

impl TextStyle {
    pub fn regular(size_px: f32, color: Rgba8) -> Self {
        Self {
            size_px,
            weight: FontWeight::Regular,
            color,
        }
    }

    pub fn bold(size_px: f32, color: Rgba8) -> Self {
        Self {
            size_px,
            weight: FontWeight::Bold,
            color,
        }
    }
}

/// Text measurement and painting.
///
/// Layout decisions (wrapping, centering) only ever go through [`Typesetter::measure`], so the
/// same implementation must back both the composition and the rasterization of one card.
pub trait Typesetter {
    /// Advance width of `text` set on a single line.
    fn measure(&self, text: &str, style: &TextStyle) -> f64;

    /// Paint `text` on a single line with its left edge at `origin.x` and its baseline at
    /// `origin.y`, in canvas space.
    fn fill_text(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TextStyle,
        origin: Point,
    ) -> CardResult<()>;
}

/// Production [`Typesetter`] backed by one regular and one bold font face.
pub struct FontBook {
    regular: Mutex<FaceEngine>,
    bold: Mutex<FaceEngine>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("regular", &self.family(FontWeight::Regular))
            .field("bold", &self.family(FontWeight::Bold))
            .finish()
    }
}

impl FontBook {
    /// Build from raw font bytes. Without a bold face the regular face is used for both.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> CardResult<Self> {
        let bold = bold.unwrap_or_else(|| regular.clone());
        Ok(Self {
            regular: Mutex::new(FaceEngine::new(regular, 0)?),
            bold: Mutex::new(FaceEngine::new(bold, 0)?),
        })
    }

    /// Build from font files on disk.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> CardResult<Self> {
        let read = |p: &Path| {
            std::fs::read(p).with_context(|| format!("read font file '{}'", p.display()))
        };
        let regular = read(regular)?;
        let bold = bold.map(read).transpose()?;
        Self::from_bytes(regular, bold)
    }

    /// Pick a sans-serif regular/bold pair from the fonts installed on this machine.
    pub fn system() -> CardResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            return Err(CardError::render("no system fonts found"));
        }

        let regular = system_face(&db, usvg::fontdb::Weight::NORMAL)
            .ok_or_else(|| CardError::render("no usable regular system font"))?;
        let bold =
            system_face(&db, usvg::fontdb::Weight::BOLD).unwrap_or_else(|| regular.clone());

        tracing::debug!(
            regular_index = regular.1,
            bold_index = bold.1,
            faces = db.len(),
            "loaded system fonts"
        );
        Ok(Self {
            regular: Mutex::new(FaceEngine::new(regular.0, regular.1)?),
            bold: Mutex::new(FaceEngine::new(bold.0, bold.1)?),
        })
    }

    /// Resolved family name for `weight`.
    pub fn family(&self, weight: FontWeight) -> String {
        self.engine(weight).family.clone()
    }

    fn engine(&self, weight: FontWeight) -> std::sync::MutexGuard<'_, FaceEngine> {
        let slot = match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Typesetter for FontBook {
    fn measure(&self, text: &str, style: &TextStyle) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let layout = self.engine(style.weight).layout(text, style.size_px);
        layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max)
    }

    fn fill_text(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TextStyle,
        origin: Point,
    ) -> CardResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut engine = self.engine(style.weight);
        let layout = engine.layout(text, style.size_px);
        let Some(first) = layout.lines().next() else {
            return Ok(());
        };
        let baseline = f64::from(first.metrics().baseline);

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            origin.x,
            origin.y - baseline,
        )));
        let c = style.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&engine.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

/// Parley contexts bound to a single registered face.
struct FaceEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl FaceEngine {
    fn new(bytes: Vec<u8>, index: u32) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::render("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        })
    }

    fn layout(&mut self, text: &str, size_px: f32) -> parley::Layout<Rgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

const FALLBACK_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

fn system_face(
    db: &usvg::fontdb::Database,
    weight: usvg::fontdb::Weight,
) -> Option<(Vec<u8>, u32)> {
    use usvg::fontdb::Family;

    let id = query_face(db, &[Family::SansSerif], weight)
        .or_else(|| {
            FALLBACK_FAMILIES
                .iter()
                .find_map(|name| query_face(db, &[Family::Name(name)], weight))
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;

    db.with_face_data(id, |data, index| (data.to_vec(), index))
}

fn query_face(
    db: &usvg::fontdb::Database,
    families: &[usvg::fontdb::Family<'_>],
    weight: usvg::fontdb::Weight,
) -> Option<usvg::fontdb::ID> {
    db.query(&usvg::fontdb::Query {
        families,
        weight,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
