use crate::{
    entry::model::{Rating, ShareableEntry},
    foundation::core::{
        Affine, Canvas, Point, Rect, Rgba8, Vec2, rotate_about_center, transformed_corners,
    },
};

/// Composition template, chosen purely by which optional images are present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutVariant {
    /// No images; text only.
    None,
    /// Cover thumbnail only, shown as a centered portrait.
    CoverOnly,
    /// Photo only, shown as a centered square.
    PhotoOnly,
    /// Photo as the main image with a rotated cover on top.
    Both,
}

impl LayoutVariant {
    /// Map image availability to a variant.
    pub fn from_presence(has_cover: bool, has_photo: bool) -> Self {
        match (has_cover, has_photo) {
            (false, false) => LayoutVariant::None,
            (true, false) => LayoutVariant::CoverOnly,
            (false, true) => LayoutVariant::PhotoOnly,
            (true, true) => LayoutVariant::Both,
        }
    }

    /// `true` when the variant draws a cover slot.
    pub fn has_cover(self) -> bool {
        matches!(self, LayoutVariant::CoverOnly | LayoutVariant::Both)
    }

    /// `true` when the variant draws a photo slot.
    pub fn has_photo(self) -> bool {
        matches!(self, LayoutVariant::PhotoOnly | LayoutVariant::Both)
    }
}

/// Drop shadow parameters, in canvas-space pixels.
///
/// `blur` follows the 2D-canvas convention: the gaussian sigma is `blur / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color including its alpha.
    pub color: Rgba8,
    /// Blur extent.
    pub blur: f64,
    /// Offset applied after the slot transform, so it is never rotated.
    pub offset: Vec2,
}

/// Placement of one image on the card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSlot {
    /// Destination rectangle before rotation. The image is stretched to fill it.
    pub rect: Rect,
    /// Clockwise rotation about the rectangle center.
    pub rotation_deg: f64,
    /// Drop shadow drawn beneath the image.
    pub shadow: Shadow,
}

impl ImageSlot {
    /// Canvas-space transform applied to [`ImageSlot::rect`].
    pub fn transform(&self) -> Affine {
        rotate_about_center(self.rect, self.rotation_deg)
    }

    /// Corners of the slot after rotation.
    pub fn corners(&self) -> [Point; 4] {
        transformed_corners(self.rect, self.transform())
    }
}

/// A horizontally centered block of wrapped lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBlock {
    /// Horizontal center of every line.
    pub center_x: f64,
    /// Baseline of the first line.
    pub first_baseline: f64,
    /// Distance between consecutive baselines.
    pub line_height: f64,
    /// Wrapping width.
    pub max_width: f64,
    /// Lines kept after wrapping; the rest are dropped.
    pub max_lines: usize,
}

impl TextBlock {
    /// Baseline of line `index` (0-based).
    pub fn baseline(&self, index: usize) -> f64 {
        self.first_baseline + self.line_height * index as f64
    }

    /// Baseline of the last line the block can hold.
    pub fn last_baseline(&self) -> f64 {
        self.baseline(self.max_lines.saturating_sub(1))
    }
}

/// Row of rating indicator circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingRow {
    /// Horizontal center of the whole row.
    pub center_x: f64,
    /// Vertical center of every circle.
    pub center_y: f64,
    /// Circle diameter.
    pub diameter: f64,
    /// Space between neighbouring circles.
    pub gap: f64,
}

impl RatingRow {
    /// Total row width.
    pub fn width(&self) -> f64 {
        let n = f64::from(Rating::MAX);
        self.diameter * n + self.gap * (n - 1.0)
    }

    /// Centers of the indicator circles, left to right.
    pub fn glyph_centers(&self) -> [Point; Rating::MAX as usize] {
        let x0 = self.center_x - self.width() * 0.5 + self.diameter * 0.5;
        let step = self.diameter + self.gap;
        std::array::from_fn(|i| Point::new(x0 + step * i as f64, self.center_y))
    }
}

/// Footer anchors; all three elements share one baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FooterRow {
    /// Shared baseline.
    pub baseline: f64,
    /// Left edge of the brand mark.
    pub left_x: f64,
    /// Center of the attribution.
    pub center_x: f64,
    /// Right edge of the type icon + label group.
    pub right_x: f64,
}

/// Absolute geometry for one card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    /// Output canvas (always [`Canvas::CARD`]).
    pub canvas: Canvas,
    /// Selected composition template.
    pub variant: LayoutVariant,
    /// Main photo slot.
    pub photo: Option<ImageSlot>,
    /// Cover slot.
    pub cover: Option<ImageSlot>,
    /// Title block.
    pub title: TextBlock,
    /// Rating row, present only when the entry has a rating.
    pub rating: Option<RatingRow>,
    /// Description block.
    pub description: TextBlock,
    /// Footer anchors.
    pub footer: FooterRow,
}

const CANVAS: Canvas = Canvas::CARD;

const SOFT_SHADOW: Shadow = Shadow {
    color: Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 38,
    },
    blur: 30.0,
    offset: Vec2::new(0.0, 10.0),
};

const COVER_SHADOW: Shadow = Shadow {
    color: Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 51,
    },
    blur: 25.0,
    offset: Vec2::new(5.0, 5.0),
};

const BOTH_PHOTO_SIZE: (f64, f64) = (900.0, 600.0);
const BOTH_PHOTO_Y: f64 = 400.0;
const BOTH_COVER_ORIGIN: (f64, f64) = (820.0, 50.0);
const BOTH_COVER_SIZE: (f64, f64) = (200.0, 280.0);
const BOTH_COVER_ROTATION_DEG: f64 = 8.0;
const PHOTO_ONLY_SIZE: f64 = 700.0;
const PHOTO_ONLY_Y: f64 = 200.0;
const COVER_ONLY_SIZE: (f64, f64) = (480.0, 650.0);
const COVER_ONLY_Y: f64 = 180.0;

const TITLE_BASELINE: f64 = 90.0;
const TITLE_LINE_HEIGHT: f64 = 58.0;
const TITLE_MAX_WIDTH: f64 = 950.0;

// Top of the rating/description stack.
const TEXT_STACK_Y: f64 = 950.0;
const TEXT_STACK_Y_NO_IMAGES: f64 = 260.0;
const RATING_DESCRIPTION_SHIFT: f64 = 45.0;

const RATING_DIAMETER: f64 = 12.0;
const RATING_GAP: f64 = 8.0;

const DESCRIPTION_LINE_HEIGHT: f64 = 35.0;
const DESCRIPTION_MAX_WIDTH: f64 = 900.0;

const FOOTER_INSET_X: f64 = 60.0;
const FOOTER_INSET_BOTTOM: f64 = 50.0;

const MAX_TEXT_LINES: usize = 2;

/// Compute the variant and geometry for `entry`. Pure and total.
pub fn plan_layout(entry: &ShareableEntry) -> CardLayout {
    plan_for(
        entry.cover_url().is_some(),
        entry.photo_url().is_some(),
        entry.rating.is_some(),
    )
}

/// Compute geometry from asset availability alone.
///
/// Used directly when a failed asset is dropped and the card is re-planned.
pub fn plan_for(has_cover: bool, has_photo: bool, has_rating: bool) -> CardLayout {
    let variant = LayoutVariant::from_presence(has_cover, has_photo);
    let (photo, cover) = image_slots(variant);

    let stack_y = match variant {
        LayoutVariant::None => TEXT_STACK_Y_NO_IMAGES,
        _ => TEXT_STACK_Y,
    };
    let rating = has_rating.then_some(RatingRow {
        center_x: CANVAS.center_x(),
        center_y: stack_y,
        diameter: RATING_DIAMETER,
        gap: RATING_GAP,
    });
    let description_y = if has_rating {
        stack_y + RATING_DESCRIPTION_SHIFT
    } else {
        stack_y
    };

    CardLayout {
        canvas: CANVAS,
        variant,
        photo,
        cover,
        title: TextBlock {
            center_x: CANVAS.center_x(),
            first_baseline: TITLE_BASELINE,
            line_height: TITLE_LINE_HEIGHT,
            max_width: TITLE_MAX_WIDTH,
            max_lines: MAX_TEXT_LINES,
        },
        rating,
        description: TextBlock {
            center_x: CANVAS.center_x(),
            first_baseline: description_y,
            line_height: DESCRIPTION_LINE_HEIGHT,
            max_width: DESCRIPTION_MAX_WIDTH,
            max_lines: MAX_TEXT_LINES,
        },
        footer: FooterRow {
            baseline: f64::from(CANVAS.height) - FOOTER_INSET_BOTTOM,
            left_x: FOOTER_INSET_X,
            center_x: CANVAS.center_x(),
            right_x: f64::from(CANVAS.width) - FOOTER_INSET_X,
        },
    }
}

fn image_slots(variant: LayoutVariant) -> (Option<ImageSlot>, Option<ImageSlot>) {
    match variant {
        LayoutVariant::None => (None, None),
        LayoutVariant::PhotoOnly => (
            Some(upright(
                centered_rect(PHOTO_ONLY_SIZE, PHOTO_ONLY_SIZE, PHOTO_ONLY_Y),
                SOFT_SHADOW,
            )),
            None,
        ),
        LayoutVariant::CoverOnly => (
            None,
            Some(upright(
                centered_rect(COVER_ONLY_SIZE.0, COVER_ONLY_SIZE.1, COVER_ONLY_Y),
                SOFT_SHADOW,
            )),
        ),
        LayoutVariant::Both => {
            let (cx, cy) = BOTH_COVER_ORIGIN;
            let (cw, ch) = BOTH_COVER_SIZE;
            (
                Some(upright(
                    centered_rect(BOTH_PHOTO_SIZE.0, BOTH_PHOTO_SIZE.1, BOTH_PHOTO_Y),
                    SOFT_SHADOW,
                )),
                Some(ImageSlot {
                    rect: Rect::new(cx, cy, cx + cw, cy + ch),
                    rotation_deg: BOTH_COVER_ROTATION_DEG,
                    shadow: COVER_SHADOW,
                }),
            )
        }
    }
}

fn upright(rect: Rect, shadow: Shadow) -> ImageSlot {
    ImageSlot {
        rect,
        rotation_deg: 0.0,
        shadow,
    }
}

fn centered_rect(width: f64, height: f64, y: f64) -> Rect {
    let x = (f64::from(CANVAS.width) - width) * 0.5;
    Rect::new(x, y, x + width, y + height)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/planner.rs"]
mod tests;
