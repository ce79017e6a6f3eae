use std::fmt;
use std::str::FromStr;

use fragment_types::{MediaType, MediaTypeError};

/// Which representation of a fragment to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewFormat {
    /// The fragment as stored.
    #[default]
    Original,
    /// Converted by the API to another media type.
    Converted(MediaType),
}

impl ViewFormat {
    pub const ORIGINAL: &'static str = "original";

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => Self::ORIGINAL,
            Self::Converted(media_type) => media_type.as_str(),
        }
    }

    /// The media type the fetched body will have for a fragment of `current` type.
    #[must_use]
    pub const fn resolve(self, current: MediaType) -> MediaType {
        match self {
            Self::Original => current,
            Self::Converted(media_type) => media_type,
        }
    }

    /// Whether a fragment of `current` type can be viewed this way.
    #[must_use]
    pub fn is_available_for(self, current: MediaType) -> bool {
        match self {
            Self::Original => true,
            Self::Converted(target) => current.can_convert_to(target),
        }
    }
}

impl fmt::Display for ViewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewFormat {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ORIGINAL {
            return Ok(Self::Original);
        }
        s.parse().map(Self::Converted)
    }
}

impl From<MediaType> for ViewFormat {
    fn from(media_type: MediaType) -> Self {
        Self::Converted(media_type)
    }
}

/// Path segment under `/v1/fragments/` for fetching fragment `id` in `view`.
///
/// Conversions are requested by appending the target subtype as an
/// extension: `id.html`, `id.json`, `id.png`.
#[must_use]
pub fn fragment_path(id: &str, view: ViewFormat) -> String {
    match view {
        ViewFormat::Original => id.to_owned(),
        ViewFormat::Converted(media_type) => format!("{id}.{}", media_type.subtype()),
    }
}

/// File name offered when downloading fragment `id` shown in `view`.
#[must_use]
pub fn download_file_name(id: &str, current_type: MediaType, view: ViewFormat) -> String {
    format!("fragment-{id}.{}", view.resolve(current_type).subtype())
}
