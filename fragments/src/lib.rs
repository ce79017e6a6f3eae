//! Client-side model of stored fragments.
//!
//! - [`Fragment`] and the list envelopes returned by the fragments API
//! - [`ViewFormat`]: which representation of a fragment to fetch, and the
//!   path and download name for it
//! - Editing helpers for text fragments
//! - [`FragmentContentCache`]: a bounded, time-limited cache of fetched bodies

pub mod cache;
pub mod edit;
mod fragment;
mod view;

pub use cache::{CacheConfig, FragmentContentCache, LOAD_ERROR_CONTENT};
pub use edit::{accepts_selected_file, can_edit, format_for_edit, is_editable};
pub use fragment::{Fragment, FragmentIdsResponse, FragmentsResponse};
pub use view::{ViewFormat, download_file_name, fragment_path};

pub use fragment_types::{MediaType, MediaTypeError};
