//! Helpers for editing and replacing fragment content.

use fragment_types::MediaType;
use tracing::debug;

use crate::view::ViewFormat;

/// Whether fragments of this type can be edited as text.
#[must_use]
pub fn is_editable(media_type: MediaType) -> bool {
    media_type.is_text()
}

/// Whether the editor is offered: text fragments, shown in their original form.
#[must_use]
pub fn can_edit(media_type: MediaType, view: ViewFormat) -> bool {
    is_editable(media_type) && view == ViewFormat::Original
}

/// Prepare fetched content for the editor.
///
/// JSON bodies are pretty-printed with two-space indentation when they parse.
/// Anything else, including JSON that does not parse, is returned unchanged.
#[must_use]
pub fn format_for_edit(content: &str, media_type: MediaType) -> String {
    if media_type != MediaType::ApplicationJson {
        return content.to_owned();
    }
    match serde_json::from_str::<serde_json::Value>(content)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(pretty) => pretty,
        Err(err) => {
            debug!(error = %err, "JSON content left unformatted");
            content.to_owned()
        }
    }
}

/// Whether a picked file may replace a fragment of type `expected`.
///
/// The file's declared MIME type must match exactly.
#[must_use]
pub fn accepts_selected_file(file_mime: &str, expected: MediaType) -> bool {
    file_mime == expected.as_str()
}
