use crate::foundation::error::{CardError, CardResult};

/// Kind of catalog item a card describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A book.
    Book,
    /// An album, track or other music release.
    Music,
    /// A feature film.
    Movie,
    /// A TV or streaming series.
    Series,
}

impl ContentType {
    /// Label printed in the card footer.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Book => "Book",
            ContentType::Music => "Music",
            ContentType::Movie => "Movie",
            ContentType::Series => "Series",
        }
    }
}

/// Star rating in `1..=5`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Highest rating; also the number of indicator glyphs on a card.
    pub const MAX: u8 = 5;

    /// Validate and wrap a rating value.
    pub fn new(value: u8) -> CardResult<Self> {
        if !(1..=Self::MAX).contains(&value) {
            return Err(CardError::validation(format!(
                "rating must be in 1..={}, got {value}",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Raw rating value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Immutable snapshot of one catalog entry, taken right before export.
///
/// The serde shape matches the persisted record (`type`, `author_artist`, `cover_image_url`,
/// `additional_image_url`, ...); unknown fields such as `id` are ignored.
///
/// Optional text and URL fields that are empty or whitespace-only count as absent everywhere
/// they are read; use the accessor methods rather than the raw fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShareableEntry {
    /// Entry title. Must be non-empty.
    pub title: String,
    /// Content type tag.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Author, artist or director.
    #[serde(default)]
    pub author_artist: Option<String>,
    /// Cover thumbnail URL.
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Full-bleed photo URL.
    #[serde(default)]
    pub additional_image_url: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional rating.
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl ShareableEntry {
    /// Create an entry with only the required fields.
    pub fn new(title: impl Into<String>, content_type: ContentType) -> CardResult<Self> {
        let entry = Self {
            title: title.into(),
            content_type,
            author_artist: None,
            cover_image_url: None,
            additional_image_url: None,
            description: None,
            rating: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Parse a persisted record from JSON and validate it.
    pub fn from_json(json: &str) -> CardResult<Self> {
        let entry: Self = serde_json::from_str(json)
            .map_err(|e| CardError::validation(format!("invalid entry json: {e}")))?;
        entry.validate()?;
        Ok(entry)
    }

    /// Check the invariants that the field types alone cannot carry.
    pub fn validate(&self) -> CardResult<()> {
        if self.title.trim().is_empty() {
            return Err(CardError::validation("entry title must be non-empty"));
        }
        Ok(())
    }

    /// Set the author/artist attribution.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author_artist = Some(author.into());
        self
    }

    /// Set the cover thumbnail URL.
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = Some(url.into());
        self
    }

    /// Set the full-bleed photo URL.
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.additional_image_url = Some(url.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the rating, validating the range.
    pub fn with_rating(mut self, rating: u8) -> CardResult<Self> {
        self.rating = Some(Rating::new(rating)?);
        Ok(self)
    }

    /// Cover URL, if present and non-blank.
    pub fn cover_url(&self) -> Option<&str> {
        non_blank(self.cover_image_url.as_deref())
    }

    /// Photo URL, if present and non-blank.
    pub fn photo_url(&self) -> Option<&str> {
        non_blank(self.additional_image_url.as_deref())
    }

    /// Attribution name, if present and non-blank.
    pub fn author(&self) -> Option<&str> {
        non_blank(self.author_artist.as_deref())
    }

    /// Description text, if present and non-blank.
    pub fn description_text(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/entry/model.rs"]
mod tests;
