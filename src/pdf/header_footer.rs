use crate::config::{Colors, Margins};
use crate::fonts::{FontFace, FontSet};
use crate::model::Rgb;

use super::flow::{DrawOp, Page, TextOp};

const HEADER_RULE_OFFSET: f32 = 18.0;
const HEADER_TEXT_OFFSET: f32 = 28.0;
const HEADER_SIZE: f32 = 10.0;
const FOOTER_RULE_OFFSET: f32 = 18.0;
const FOOTER_TEXT_OFFSET: f32 = 32.0;
const FOOTER_SIZE: f32 = 9.0;
const RULE_THICKNESS: f32 = 1.0;

pub fn page_label(page_no: usize, total: usize) -> String {
    format!("Page {page_no} of {total}")
}

/// Everything one page needs to carry its running header and footer.
pub struct RunningText<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub fonts: &'a FontSet,
    pub margins: &'a Margins,
    pub colors: &'a Colors,
}

impl RunningText<'_> {
    fn text(&self, x: f32, y: f32, size: f32, face: FontFace, text: String) -> DrawOp {
        DrawOp::Text(TextOp {
            x,
            y,
            size,
            face,
            color: self.colors.muted,
            text,
        })
    }

    fn rule(&self, width: f32, y: f32, color: Rgb) -> DrawOp {
        DrawOp::Line {
            from: (self.margins.left, y),
            to: (width - self.margins.right, y),
            thickness: RULE_THICKNESS,
            color,
        }
    }

    /// Header and footer operations for page `page_no` (1-based) of `total`.
    /// The page label is right-aligned by its measured width.
    pub fn ops_for(&self, page_width: f32, page_height: f32, page_no: usize, total: usize) -> Vec<DrawOp> {
        let Margins {
            top, bottom, left, right,
        } = *self.margins;
        let label = page_label(page_no, total);
        let label_w = self.fonts.regular().text_width(&label, FOOTER_SIZE);

        vec![
            self.rule(page_width, page_height - top + HEADER_RULE_OFFSET, self.colors.border),
            self.text(
                left,
                page_height - top + HEADER_TEXT_OFFSET,
                HEADER_SIZE,
                FontFace::Bold,
                self.title.to_string(),
            ),
            self.rule(page_width, bottom - FOOTER_RULE_OFFSET, self.colors.border),
            self.text(
                left,
                bottom - FOOTER_TEXT_OFFSET,
                FOOTER_SIZE,
                FontFace::Regular,
                format!("Generated: {}", self.date),
            ),
            self.text(
                page_width - right - label_w,
                bottom - FOOTER_TEXT_OFFSET,
                FOOTER_SIZE,
                FontFace::Regular,
                label,
            ),
        ]
    }
}

/// Final pass over the completed page list, once the total is known.
pub fn stamp_pages(pages: &mut [Page], running: &RunningText) {
    let total = pages.len();
    for (idx, page) in pages.iter_mut().enumerate() {
        let ops = running.ops_for(page.width, page.height, idx + 1, total);
        page.ops.extend(ops);
    }
}
