//! rndm-card renders a catalog entry into a square PNG share card.
//!
//! An export runs in four steps:
//!
//! - Validate the [`ShareableEntry`] and pick a [`CardLayout`] for the images it carries
//! - Fetch and decode the cover and photo concurrently through an [`ImageFetcher`]
//! - Compose a [`CardPlan`] and rasterize it on the CPU
//! - Encode the frame as PNG and hand it to a [`FileSink`]
//!
//! [`Exporter`] drives the whole sequence and rejects overlapping exports.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod encode;
mod entry;
mod export;
mod foundation;
mod layout;
mod render;
mod text;


pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2, rotate_about_center,
    transformed_corners,
};
pub use crate::foundation::error::{CardError, CardResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::fetch::{
    AssetFailurePolicy, CardAssets, HttpFetcher, ImageFetcher, load_card_assets, load_image,
};
pub use crate::compose::icons::type_icon;
pub use crate::compose::plan::{CardPlan, DrawCmd, DrawOp, ImageSlotKind, Role, compose_card};
pub use crate::compose::theme::CardTheme;
pub use crate::encode::png::{EncodedCard, card_file_name, encode_png, slugify};
pub use crate::encode::sink::{DirSink, FileSink, MemorySink, SavedFile};
pub use crate::entry::model::{ContentType, Rating, ShareableEntry};
pub use crate::export::exporter::{ExportOpts, ExportState, Exporter};
pub use crate::export::pipeline::{encode_card, render_card, render_frame};
pub use crate::layout::planner::{
    CardLayout, FooterRow, ImageSlot, LayoutVariant, RatingRow, Shadow, TextBlock, plan_for,
    plan_layout,
};
pub use crate::render::FrameRGBA;
pub use crate::render::cpu::rasterize;
pub use crate::text::fonts::{FontBook, FontWeight, TextStyle, Typesetter};
pub use crate::text::wrap::wrap_text;
