use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One structural unit of parsed content. Produced one per input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Spacer,
    Heading1(String),
    Heading2(String),
    Bullet(String),
    Text(String),
}

impl Block {
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Spacer => None,
            Block::Heading1(t) | Block::Heading2(t) | Block::Bullet(t) | Block::Text(t) => {
                Some(t)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStyle {
    Normal,
    Bold,
    Italic,
}

/// A contiguous styled slice of a rendered line, delimiters removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// RGB colour with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Inbound generation request, shaped like the JSON body callers send.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
}

impl GenerateRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            logo_base64: None,
        }
    }

    pub fn with_logo(mut self, logo_base64: impl Into<String>) -> Self {
        self.logo_base64 = Some(logo_base64.into());
        self
    }

    /// Parse a JSON request body. Malformed bodies are a caller error, not a
    /// configuration one.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::InvalidRequest)
    }

    /// Title and content must both be non-blank. Title is checked first.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::MissingField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(Error::MissingField("content"));
        }
        Ok(())
    }
}

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const PDF_FILENAME: &str = "generated.pdf";

/// Serialized document plus the metadata a transport needs to deliver it.
#[derive(Clone, Debug)]
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
    pub page_count: usize,
}

impl GeneratedPdf {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}
