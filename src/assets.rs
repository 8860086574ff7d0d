use std::path::Path;

use crate::config::AssetPaths;

/// Static asset bytes, loaded once and shared read-only by every request.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    pub font_regular: Option<Vec<u8>>,
    pub font_bold: Option<Vec<u8>>,
    pub font_italic: Option<Vec<u8>>,
    pub default_logo: Option<Vec<u8>>,
}

fn safe_read(path: Option<&Path>, what: &str) -> Option<Vec<u8>> {
    let path = path?;
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("{what} not loaded from {}: {e}", path.display());
            None
        }
    }
}

impl Assets {
    /// Read every configured asset. Read failures are not errors: the slot
    /// simply stays empty.
    pub fn load(paths: &AssetPaths) -> Self {
        let assets = Self {
            font_regular: safe_read(paths.font_regular.as_deref(), "regular font"),
            font_bold: safe_read(paths.font_bold.as_deref(), "bold font"),
            font_italic: safe_read(paths.font_italic.as_deref(), "italic font"),
            default_logo: safe_read(paths.default_logo.as_deref(), "fallback logo"),
        };
        log::debug!(
            "assets: regular={} bold={} italic={} logo={}",
            assets.font_regular.is_some(),
            assets.font_bold.is_some(),
            assets.font_italic.is_some(),
            assets.default_logo.is_some(),
        );
        assets
    }
}
