//! Centered, faded background image stamped on every page before any text.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::model::Rgb;

use super::flow::{DrawOp, Page};

/// Fraction of the page width the watermark is scaled to.
pub const WIDTH_FRACTION: f32 = 0.6;
/// Opacity of the white wash laid over the image. Higher is fainter.
pub const WASH_OPACITY: f32 = 0.70;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

/// Formats tried in order; when every attempt fails the watermark is skipped.
pub const DECODE_ATTEMPTS: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

#[derive(Clone, Debug)]
pub enum ImagePixels {
    /// Original grayscale or RGB JPEG bytes, passed through with DCTDecode.
    Jpeg { data: Vec<u8>, grayscale: bool },
    /// Decoded pixels (PNG, or CMYK JPEG converted to RGB); alpha becomes an
    /// SMask when not fully opaque.
    Rgba(image::RgbaImage),
}

#[derive(Clone, Debug)]
pub struct WatermarkImage {
    pub format: ImageFormat,
    pub pixels: ImagePixels,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Accept a data URI (`data:image/png;base64,....`) or bare base64. Line
/// breaks and other ASCII whitespace inside the payload are ignored.
pub fn decode_logo_base64(input: &str) -> Option<Vec<u8>> {
    let payload = match input.find("base64,") {
        Some(pos) => &input[pos + "base64,".len()..],
        None => input,
    };
    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return None;
    }
    match LENIENT_BASE64.decode(&payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::debug!("logo base64 rejected: {e}");
            None
        }
    }
}

/// Number of colour components declared in a JPEG's start-of-frame header.
pub fn jpeg_component_count(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        if marker == 0xDA {
            return None;
        }
        pos += 2 + len;
    }
    None
}

fn try_decode(bytes: &[u8], format: ImageFormat) -> Option<WatermarkImage> {
    match format {
        ImageFormat::Png => {
            let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).ok()?;
            let rgba = decoded.to_rgba8();
            Some(WatermarkImage {
                format,
                pixel_width: rgba.width(),
                pixel_height: rgba.height(),
                pixels: ImagePixels::Rgba(rgba),
            })
        }
        ImageFormat::Jpeg => {
            let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg).ok()?;
            // CMYK streams come back from the decoder already converted to RGB;
            // embed those pixels instead of the original DCT data.
            let pixels = if jpeg_component_count(bytes) == Some(4) {
                log::debug!("CMYK JPEG watermark, re-encoding as RGB");
                ImagePixels::Rgba(decoded.to_rgba8())
            } else {
                ImagePixels::Jpeg {
                    data: bytes.to_vec(),
                    grayscale: decoded.color().channel_count() == 1,
                }
            };
            Some(WatermarkImage {
                format,
                pixel_width: decoded.width(),
                pixel_height: decoded.height(),
                pixels,
            })
        }
    }
}

/// Run the decode attempts in order. `None` is the terminal "skip" outcome.
pub fn decode_image(bytes: &[u8]) -> Option<WatermarkImage> {
    for format in DECODE_ATTEMPTS {
        if let Some(img) = try_decode(bytes, format) {
            if img.pixel_width == 0 || img.pixel_height == 0 {
                break;
            }
            return Some(img);
        }
        log::debug!("watermark is not {format:?}");
    }
    log::warn!("watermark image could not be decoded as PNG or JPEG, skipping");
    None
}

/// A decoded watermark and where it sits on the page.
#[derive(Clone, Debug)]
pub struct Watermark {
    pub image: WatermarkImage,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Watermark {
    /// Scale to [`WIDTH_FRACTION`] of the page width, keeping aspect ratio,
    /// and center on the page.
    pub fn place(image: WatermarkImage, page_width: f32, page_height: f32) -> Self {
        let target_w = page_width * WIDTH_FRACTION;
        let scale = target_w / image.pixel_width as f32;
        let width = image.pixel_width as f32 * scale;
        let height = image.pixel_height as f32 * scale;
        Self {
            image,
            x: (page_width - width) / 2.0,
            y: (page_height - height) / 2.0,
            width,
            height,
        }
    }

    /// Pick the image source and decode it. A request-supplied logo is the only
    /// candidate when present; the fallback is used only when the request has
    /// none. Any failure yields no watermark.
    pub fn prepare(
        logo_base64: Option<&str>,
        fallback: Option<&[u8]>,
        page_width: f32,
        page_height: f32,
    ) -> Option<Self> {
        let bytes = match logo_base64.filter(|s| !s.trim().is_empty()) {
            Some(encoded) => decode_logo_base64(encoded)?,
            None => fallback?.to_vec(),
        };
        let image = decode_image(&bytes)?;
        Some(Self::place(image, page_width, page_height))
    }

    /// Draw the image, then wash the whole page with translucent white so text
    /// drawn afterwards reads over a faded mark.
    pub fn stamp(&self, page: &mut Page) {
        page.ops.push(DrawOp::Image {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        });
        page.ops.push(DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: page.width,
            height: page.height,
            color: Rgb::WHITE,
            opacity: WASH_OPACITY,
        });
    }
}
