#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use chrono::NaiveDate;

use richtext_pdf::config::Config;
use richtext_pdf::pdf::{DrawOp, Page, TextOp};

/// Footer date used by every rendered fixture.
pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

pub const FIXED_DATE_LABEL: &str = "09/03/2024";

/// Every character is half the font size wide.
pub fn mono_measure(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

pub fn fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 90, 200, 160]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", to_base64(bytes))
}

/// Text drawn in the body colour, i.e. everything but the running header
/// and footer.
pub fn body_texts<'a>(page: &'a Page, config: &Config) -> Vec<&'a TextOp> {
    let body = config.colors.text;
    page.texts().filter(|t| t.color == body).collect()
}

pub fn image_count(page: &Page) -> usize {
    page.ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Image { .. }))
        .count()
}

/// `count` lines of four short words each; every line fits on one row.
pub fn short_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {i} of text"))
        .collect::<Vec<_>>()
        .join("\n")
}
