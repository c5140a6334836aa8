use crate::{
    assets::fetch::CardAssets,
    compose::{plan::compose_card, theme::CardTheme},
    encode::png::{EncodedCard, card_file_name, encode_png},
    entry::model::ShareableEntry,
    foundation::error::CardResult,
    layout::planner::CardLayout,
    render::{FrameRGBA, cpu::rasterize},
    text::fonts::Typesetter,
};

/// Compose and rasterize a card whose images are already decoded.
///
/// Returns **premultiplied** RGBA8 pixels. Every image slot in `layout` needs a matching image
/// in `assets`.
pub fn render_frame<T: Typesetter + ?Sized>(
    entry: &ShareableEntry,
    layout: &CardLayout,
    assets: &CardAssets,
    theme: &CardTheme,
    typesetter: &T,
) -> CardResult<FrameRGBA> {
    let plan = compose_card(entry, layout, theme, typesetter);
    tracing::debug!(
        variant = ?layout.variant,
        commands = plan.commands.len(),
        "composed card"
    );
    rasterize(&plan, assets, typesetter)
}

/// Encode a rendered frame under the entry's card file name.
pub fn encode_card(entry: &ShareableEntry, frame: &FrameRGBA) -> CardResult<EncodedCard> {
    Ok(EncodedCard {
        file_name: card_file_name(&entry.title),
        png: encode_png(frame)?,
    })
}

/// [`render_frame`] followed by [`encode_card`].
pub fn render_card<T: Typesetter + ?Sized>(
    entry: &ShareableEntry,
    layout: &CardLayout,
    assets: &CardAssets,
    theme: &CardTheme,
    typesetter: &T,
) -> CardResult<EncodedCard> {
    let frame = render_frame(entry, layout, assets, theme, typesetter)?;
    encode_card(entry, &frame)
}
