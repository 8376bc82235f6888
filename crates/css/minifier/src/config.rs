//! Run options.

use anyhow::{Context as _, Result};
use css_cascade::UnlayeredPrecedence;
use serde::Deserialize;

/// Options of a minifier run, deserializable from camelCase JSON:
/// `{"keepPrintStyleSheets": true, "unlayeredPrecedence": "aboveLayers"}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifierOptions {
    /// Keep rules guarded by `print` media.
    #[serde(rename = "keepPrintStyleSheets")]
    pub keep_print_stylesheets: bool,
    /// Rank of unlayered declarations against layered ones.
    pub unlayered_precedence: UnlayeredPrecedence,
}

impl MinifierOptions {
    /// Parse options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// When `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse minifier options")
    }
}
