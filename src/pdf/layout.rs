use crate::config::{Colors, Theme};
use crate::fonts::{FontFace, FontSet};
use crate::markup::split_styled_runs;
use crate::model::Block;

use super::flow::{DrawOp, PageFlow, TextOp};

pub const SPACER_HEIGHT: f32 = 12.0;
pub const HEADING1_SPACE: f32 = 22.0;
pub const HEADING2_SPACE: f32 = 20.0;
pub const BULLET_GLYPH: &str = "\u{2022}";

/// Gap between the title baseline and its accent rule.
const TITLE_RULE_GAP: f32 = 14.0;
/// Gap between the accent rule and the first block.
const TITLE_AFTER_RULE: f32 = 28.0;
const TITLE_RULE_MAX_LEN: f32 = 220.0;
const TITLE_RULE_THICKNESS: f32 = 2.0;

/// Greedy word wrap on single spaces.
///
/// Each line measures at most `max_width` with `measure(text, font_size)`,
/// except a single word wider than `max_width`, which gets a line of its own
/// and is never split. Empty input gives no lines.
pub fn wrap_line(
    text: &str,
    measure: impl Fn(&str, f32) -> f32,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Maps parsed blocks onto draw operations through a [`PageFlow`].
pub struct BlockRenderer<'a> {
    fonts: &'a FontSet,
    theme: &'a Theme,
    colors: &'a Colors,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(fonts: &'a FontSet, theme: &'a Theme, colors: &'a Colors) -> Self {
        Self {
            fonts,
            theme,
            colors,
        }
    }

    fn text(&self, x: f32, y: f32, size: f32, face: FontFace, text: &str) -> DrawOp {
        DrawOp::Text(TextOp {
            x,
            y,
            size,
            face,
            color: self.colors.text,
            text: text.to_string(),
        })
    }

    /// Large title and accent rule at the top of the first page.
    pub fn title_banner(&self, flow: &mut PageFlow, title: &str) {
        let left = flow.geometry().margins.left;
        let max_width = flow.geometry().max_width();

        flow.draw(self.text(left, flow.y(), self.theme.title_size, FontFace::Bold, title));
        flow.advance(TITLE_RULE_GAP);

        let y = flow.y();
        flow.draw(DrawOp::Line {
            from: (left, y),
            to: (left + TITLE_RULE_MAX_LEN.min(max_width), y),
            thickness: TITLE_RULE_THICKNESS,
            color: self.colors.accent,
        });
        flow.advance(TITLE_AFTER_RULE);
    }

    pub fn render_blocks(&self, flow: &mut PageFlow, blocks: &[Block]) {
        for block in blocks {
            self.render_block(flow, block);
        }
    }

    pub fn render_block(&self, flow: &mut PageFlow, block: &Block) {
        match block {
            Block::Spacer => {
                flow.ensure_space(SPACER_HEIGHT);
                flow.advance(SPACER_HEIGHT);
            }
            Block::Heading1(text) => {
                self.heading(flow, text, self.theme.heading1_size, HEADING1_SPACE)
            }
            Block::Heading2(text) => {
                self.heading(flow, text, self.theme.heading2_size, HEADING2_SPACE)
            }
            Block::Bullet(text) => self.paragraph(flow, text, self.theme.bullet_indent, true),
            Block::Text(text) => self.paragraph(flow, text, 0.0, false),
        }
    }

    /// Headings draw their raw text; `*` markers are not interpreted.
    fn heading(&self, flow: &mut PageFlow, text: &str, size: f32, space: f32) {
        flow.ensure_space(space);
        let left = flow.geometry().margins.left;
        flow.draw(self.text(left, flow.y(), size, FontFace::Bold, text));
        flow.advance(space);
    }

    /// Wrapping measures with the regular face whatever the inline styling, so
    /// a line heavy with bold runs can draw slightly wider than `max_width`.
    fn paragraph(&self, flow: &mut PageFlow, text: &str, indent: f32, bullet: bool) {
        let size = self.theme.body_size;
        let left = flow.geometry().margins.left;
        let max_width = flow.geometry().max_width() - indent;
        let regular = self.fonts.regular();
        let lines = wrap_line(text, |s, fs| regular.text_width(s, fs), size, max_width);

        for (i, line) in lines.iter().enumerate() {
            flow.ensure_space(self.theme.line_height);
            if bullet && i == 0 {
                flow.draw(self.text(left, flow.y(), size, FontFace::Bold, BULLET_GLYPH));
            }
            self.styled_line(flow, line, left + indent, size);
            flow.advance(self.theme.line_height);
        }
    }

    fn styled_line(&self, flow: &mut PageFlow, line: &str, x0: f32, size: f32) {
        let y = flow.y();
        let mut x = x0;
        for run in split_styled_runs(line) {
            let face = self.fonts.resolve(run.style);
            let width = self.fonts.face(face).text_width(&run.text, size);
            if !run.text.is_empty() {
                flow.draw(self.text(x, y, size, face, &run.text));
            }
            x += width;
        }
    }
}
