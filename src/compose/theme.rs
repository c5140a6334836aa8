use crate::{
    foundation::core::Rgba8,
    text::fonts::TextStyle,
};

/// Palette and typography for a card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardTheme {
    /// Full-canvas background.
    pub background: Rgba8,
    /// Filled rating circles.
    pub rating_filled: Rgba8,
    /// Unfilled rating circles.
    pub rating_empty: Rgba8,
    /// Content-type icon fill.
    pub icon: Rgba8,
    pub title: TextStyle,
    pub description: TextStyle,
    pub brand: TextStyle,
    pub attribution: TextStyle,
    pub type_label: TextStyle,
    /// Brand mark printed bottom-left.
    pub brand_text: String,
    /// Edge length of the square content-type icon.
    pub icon_size: f64,
    /// Space between the icon and the type label.
    pub icon_gap: f64,
}

const CREAM: Rgba8 = Rgba8::from_rgb_hex(0xFAF9F6);
const FOREST: Rgba8 = Rgba8::from_rgb_hex(0x35553D);
const GRAY_200: Rgba8 = Rgba8::from_rgb_hex(0xE5E7EB);
const GRAY_400: Rgba8 = Rgba8::from_rgb_hex(0x9CA3AF);
const GRAY_500: Rgba8 = Rgba8::from_rgb_hex(0x6B7280);
const BLACK: Rgba8 = Rgba8::from_rgb_hex(0x000000);

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: CREAM,
            rating_filled: FOREST,
            rating_empty: GRAY_200,
            icon: FOREST,
            title: TextStyle::bold(52.0, BLACK),
            description: TextStyle::regular(28.0, GRAY_500),
            brand: TextStyle::bold(32.0, GRAY_400),
            attribution: TextStyle::regular(26.0, GRAY_500),
            type_label: TextStyle::bold(28.0, FOREST),
            brand_text: "rndm".to_owned(),
            icon_size: 26.0,
            icon_gap: 10.0,
        }
    }
}

impl CardTheme {
    pub fn with_background(mut self, color: Rgba8) -> Self {
        self.background = color;
        self
    }

    /// Recolor every accent element: filled rating circles, type icon and type label.
    pub fn with_accent(mut self, color: Rgba8) -> Self {
        self.rating_filled = color;
        self.icon = color;
        self.type_label.color = color;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand_text = brand.into();
        self
    }
}
