use kurbo::{Circle, Shape};

use crate::{
    compose::{icons::type_icon, theme::CardTheme},
    entry::model::ShareableEntry,
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8},
    layout::planner::{CardLayout, ImageSlot, Shadow, TextBlock},
    text::{
        fonts::{TextStyle, Typesetter},
        wrap::wrap_text,
    },
};

/// Which decoded image an [`DrawOp::Image`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlotKind {
    Cover,
    Photo,
}

/// Visual role of a draw command; lets tests and tooling inspect a plan without pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    PhotoShadow,
    Photo,
    CoverShadow,
    Cover,
    Title,
    RatingFilled,
    RatingEmpty,
    Description,
    Brand,
    Attribution,
    TypeIcon,
    TypeLabel,
}

/// One primitive the rasterizer knows how to paint. Coordinates are canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Solid fill of `path` after `transform`.
    Fill {
        path: BezPath,
        color: Rgba8,
        transform: Affine,
    },
    /// Blurred drop shadow of `rect` (placed by `transform`), offset in canvas space.
    Shadow {
        rect: Rect,
        shadow: Shadow,
        transform: Affine,
    },
    /// Decoded image stretched into `rect`, then placed by `transform`.
    Image {
        slot: ImageSlotKind,
        rect: Rect,
        transform: Affine,
    },
    /// A single line of text; `origin` is the left end of its baseline.
    Text {
        text: String,
        style: TextStyle,
        origin: Point,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCmd {
    pub role: Role,
    pub op: DrawOp,
}

/// Ordered, immutable draw list for one card. Later commands paint over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPlan {
    pub canvas: Canvas,
    pub commands: Vec<DrawCmd>,
}

impl CardPlan {
    /// Roles in paint order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.commands.iter().map(|c| c.role)
    }

    /// Number of commands tagged `role`.
    pub fn count(&self, role: Role) -> usize {
        self.roles().filter(|r| *r == role).count()
    }

    /// Text of every [`DrawOp::Text`] tagged `role`, in paint order.
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.role == role)
            .filter_map(|c| match &c.op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Build the draw list for `entry` from its layout.
///
/// Paint order: background, image slots (photo then cover, each shadow first), title, rating,
/// description, footer.
pub fn compose_card<T: Typesetter + ?Sized>(
    entry: &ShareableEntry,
    layout: &CardLayout,
    theme: &CardTheme,
    typesetter: &T,
) -> CardPlan {
    let mut out = Vec::new();

    out.push(DrawCmd {
        role: Role::Background,
        op: DrawOp::Fill {
            path: layout.canvas.rect().to_path(0.1),
            color: theme.background,
            transform: Affine::IDENTITY,
        },
    });

    if let Some(slot) = &layout.photo {
        push_image(&mut out, slot, ImageSlotKind::Photo);
    }
    if let Some(slot) = &layout.cover {
        push_image(&mut out, slot, ImageSlotKind::Cover);
    }

    push_block(
        &mut out,
        Role::Title,
        &entry.title,
        &layout.title,
        &theme.title,
        typesetter,
    );

    if let (Some(row), Some(rating)) = (&layout.rating, entry.rating) {
        let filled = usize::from(rating.get());
        for (i, center) in row.glyph_centers().into_iter().enumerate() {
            let (role, color) = if i < filled {
                (Role::RatingFilled, theme.rating_filled)
            } else {
                (Role::RatingEmpty, theme.rating_empty)
            };
            out.push(DrawCmd {
                role,
                op: DrawOp::Fill {
                    path: Circle::new(center, row.diameter * 0.5).to_path(0.1),
                    color,
                    transform: Affine::IDENTITY,
                },
            });
        }
    }

    if let Some(description) = entry.description_text() {
        push_block(
            &mut out,
            Role::Description,
            description,
            &layout.description,
            &theme.description,
            typesetter,
        );
    }

    let footer = &layout.footer;
    out.push(text_cmd(
        Role::Brand,
        theme.brand_text.clone(),
        theme.brand,
        Point::new(footer.left_x, footer.baseline),
    ));

    if let Some(author) = entry.author() {
        let text = format!("by {author}");
        let w = typesetter.measure(&text, &theme.attribution);
        out.push(text_cmd(
            Role::Attribution,
            text,
            theme.attribution,
            Point::new(footer.center_x - w * 0.5, footer.baseline),
        ));
    }

    let label = entry.content_type.label();
    let label_x = footer.right_x - typesetter.measure(label, &theme.type_label);
    let icon_x1 = label_x - theme.icon_gap;
    let icon_rect = Rect::new(
        icon_x1 - theme.icon_size,
        footer.baseline - theme.icon_size,
        icon_x1,
        footer.baseline,
    );
    out.push(DrawCmd {
        role: Role::TypeIcon,
        op: DrawOp::Fill {
            path: type_icon(entry.content_type, icon_rect),
            color: theme.icon,
            transform: Affine::IDENTITY,
        },
    });
    out.push(text_cmd(
        Role::TypeLabel,
        label.to_owned(),
        theme.type_label,
        Point::new(label_x, footer.baseline),
    ));

    CardPlan {
        canvas: layout.canvas,
        commands: out,
    }
}

fn push_image(out: &mut Vec<DrawCmd>, slot: &ImageSlot, kind: ImageSlotKind) {
    let (shadow_role, image_role) = match kind {
        ImageSlotKind::Photo => (Role::PhotoShadow, Role::Photo),
        ImageSlotKind::Cover => (Role::CoverShadow, Role::Cover),
    };
    let transform = slot.transform();
    out.push(DrawCmd {
        role: shadow_role,
        op: DrawOp::Shadow {
            rect: slot.rect,
            shadow: slot.shadow,
            transform,
        },
    });
    out.push(DrawCmd {
        role: image_role,
        op: DrawOp::Image {
            slot: kind,
            rect: slot.rect,
            transform,
        },
    });
}

fn push_block<T: Typesetter + ?Sized>(
    out: &mut Vec<DrawCmd>,
    role: Role,
    text: &str,
    block: &TextBlock,
    style: &TextStyle,
    typesetter: &T,
) {
    let measure = |s: &str| typesetter.measure(s, style);
    let lines = wrap_text(text, block.max_width, measure);
    for (i, line) in lines.into_iter().take(block.max_lines).enumerate() {
        if line.is_empty() {
            continue;
        }
        let w = measure(&line);
        let origin = Point::new(block.center_x - w * 0.5, block.baseline(i));
        out.push(text_cmd(role, line, *style, origin));
    }
}

fn text_cmd(role: Role, text: String, style: TextStyle, origin: Point) -> DrawCmd {
    DrawCmd {
        role,
        op: DrawOp::Text {
            text,
            style,
            origin,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
