use chrono::{DateTime, Utc};
use fragment_types::MediaType;
use serde::{Deserialize, Serialize};

use crate::view::{ViewFormat, fragment_path};

/// Status value the API reports on success.
const STATUS_OK: &str = "ok";

/// A stored fragment as returned by `GET /v1/fragments?expand=1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub id: String,
    pub owner_id: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Body size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Inline body, when the listing carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Fragment {
    /// Path segment to fetch this fragment in the given view.
    #[must_use]
    pub fn path(&self, view: ViewFormat) -> String {
        fragment_path(&self.id, view)
    }

    /// Formats this fragment may be viewed as, its own type included.
    #[must_use]
    pub const fn conversions(&self) -> &'static [MediaType] {
        self.media_type.conversions()
    }

    #[must_use]
    pub fn was_modified(&self) -> bool {
        self.updated > self.created
    }
}

/// Envelope of the expanded fragment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentsResponse {
    pub status: String,
    pub fragments: Vec<Fragment>,
}

impl FragmentsResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Envelope of the id-only fragment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentIdsResponse {
    pub status: String,
    pub fragments: Vec<String>,
}

impl FragmentIdsResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
