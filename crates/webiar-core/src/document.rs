//! The HTML document shared by the editor and the live preview.

use serde::{Deserialize, Serialize};

/// The editor's HTML contents plus a monotonic revision counter.
///
/// Replacement is always wholesale: the previous contents are discarded
/// and the revision bumps, which is what lets the preview tell "reload
/// needed" apart from "nothing changed". The HTML is trusted as-is — no
/// sanitization happens anywhere in the pipeline, so script tags in
/// server-supplied markup will execute in whatever browser renders the
/// preview.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlDocument {
    html: String,
    revision: u64,
}

impl HtmlDocument {
    /// Create an empty document at revision 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full contents and bump the revision.
    ///
    /// Returns the new revision.
    pub fn replace(&mut self, html: impl Into<String>) -> u64 {
        self.html = html.into();
        self.revision += 1;
        self.revision
    }

    /// Current HTML contents.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Current revision. Starts at 0, bumps on every replacement.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
