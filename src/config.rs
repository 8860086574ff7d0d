use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl Default for PageSize {
    /// A4 in points.
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 80.0,
            bottom: 70.0,
            left: 60.0,
            right: 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub text: Rgb,
    pub muted: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            text: Rgb::new(0.12, 0.12, 0.12),
            muted: Rgb::new(0.45, 0.45, 0.45),
            border: Rgb::new(0.86, 0.86, 0.86),
            accent: Rgb::new(0.10, 0.45, 0.95),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub title_size: f32,
    pub heading1_size: f32,
    pub heading2_size: f32,
    pub body_size: f32,
    pub line_height: f32,
    pub bullet_indent: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_size: 20.0,
            heading1_size: 16.0,
            heading2_size: 14.0,
            body_size: 11.0,
            line_height: 16.0,
            bullet_indent: 14.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultText {
    pub title: String,
    pub content: String,
}

impl Default for DefaultText {
    fn default() -> Self {
        Self {
            title: "Untitled Document".to_string(),
            content: "Write content here...".to_string(),
        }
    }
}

/// Optional on-disk assets. Anything missing or unreadable degrades to the
/// built-in fonts or to no watermark.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub font_regular: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
    pub font_italic: Option<PathBuf>,
    pub default_logo: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageSize,
    pub margins: Margins,
    pub colors: Colors,
    pub theme: Theme,
    pub default_text: DefaultText,
    pub assets: AssetPaths,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        Self::from_json_str(&text)
    }
}
