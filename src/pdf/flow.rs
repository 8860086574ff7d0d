use crate::config::{Config, Margins};
use crate::fonts::FontFace;
use crate::model::Rgb;

use super::watermark::Watermark;

/// Distance from the top margin down to the first baseline of a page.
pub const CONTENT_TOP_OFFSET: f32 = 10.0;
/// Space above the bottom margin kept free of body content for the footer.
pub const FOOTER_SAFE_OFFSET: f32 = 45.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
    pub text: String,
}

/// One drawing primitive, in PDF user space (origin bottom-left).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Rgb,
    },
    /// The document's watermark image, scaled into the given box.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        opacity: f32,
    },
}

/// A finished or in-progress page: its size and an append-only display list.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts().any(|t| t.text == text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.page.width,
            height: config.page.height,
            margins: config.margins,
        }
    }

    /// Cursor position at the top of every page.
    pub fn content_top(&self) -> f32 {
        self.height - self.margins.top - CONTENT_TOP_OFFSET
    }

    /// Lowest y any body line may reach.
    pub fn footer_boundary(&self) -> f32 {
        self.margins.bottom + FOOTER_SAFE_OFFSET
    }

    pub fn usable_height(&self) -> f32 {
        self.content_top() - self.footer_boundary()
    }

    pub fn max_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }
}

/// Owns the vertical cursor and the page list while body content is laid out.
///
/// Callers reserve room with [`ensure_space`](Self::ensure_space) before
/// drawing a line and move the cursor with [`advance`](Self::advance) after.
/// A page break stamps the watermark on the new page before anything else.
pub struct PageFlow<'w> {
    geometry: PageGeometry,
    watermark: Option<&'w Watermark>,
    pages: Vec<Page>,
    y: f32,
    fresh: bool,
}

impl<'w> PageFlow<'w> {
    pub fn new(geometry: PageGeometry, watermark: Option<&'w Watermark>) -> Self {
        let mut flow = Self {
            geometry,
            watermark,
            pages: Vec::new(),
            y: geometry.content_top(),
            fresh: true,
        };
        flow.start_page();
        flow
    }

    fn start_page(&mut self) {
        let mut page = Page::new(self.geometry.width, self.geometry.height);
        if let Some(watermark) = self.watermark {
            watermark.stamp(&mut page);
        }
        self.pages.push(page);
        self.y = self.geometry.content_top();
        self.fresh = true;
        log::debug!("page {} started", self.pages.len());
    }

    /// Break to a new page if `needed` points below the cursor would cross the
    /// footer boundary. Returns whether a break happened. A fresh page never
    /// breaks again, so content taller than a whole page is drawn overflowing
    /// instead of producing blank pages.
    pub fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y - needed < self.geometry.footer_boundary() && !self.fresh {
            self.start_page();
            return true;
        }
        false
    }

    pub fn advance(&mut self, amount: f32) {
        self.y -= amount;
        self.fresh = false;
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append to the current page.
    pub fn draw(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}
