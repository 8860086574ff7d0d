use chrono::NaiveDate;

use crate::assets::Assets;
use crate::config::Config;
use crate::error::Error;
use crate::fonts::FontSet;
use crate::markup::parse_rich_text;
use crate::model::{Block, GenerateRequest, GeneratedPdf, PDF_CONTENT_TYPE, PDF_FILENAME};
use crate::pdf::header_footer::{RunningText, stamp_pages};
use crate::pdf::layout::BlockRenderer;
use crate::pdf::watermark::Watermark;
use crate::pdf::{Page, PageFlow, PageGeometry, write_pdf};

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Everything one generation request needs, resolved up front: fonts,
/// watermark, parsed blocks. Created per request and dropped after
/// serialization.
pub struct Session<'a> {
    config: &'a Config,
    fonts: FontSet,
    watermark: Option<Watermark>,
    title: String,
    blocks: Vec<Block>,
    date: String,
}

impl<'a> Session<'a> {
    /// Does not validate: blank fields fall back to the configured default text.
    pub fn new(request: &GenerateRequest, config: &'a Config, assets: &Assets, date: NaiveDate) -> Self {
        let title = match request.title.trim() {
            "" => config.default_text.title.trim().to_string(),
            t => t.to_string(),
        };
        let content = if request.content.is_empty() {
            config.default_text.content.as_str()
        } else {
            request.content.as_str()
        };

        let fonts = FontSet::load(assets);
        let watermark = Watermark::prepare(
            request.logo_base64.as_deref(),
            assets.default_logo.as_deref(),
            config.page.width,
            config.page.height,
        );

        Self {
            config,
            fonts,
            watermark,
            title,
            blocks: parse_rich_text(content),
            date: format_date(date),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn watermark(&self) -> Option<&Watermark> {
        self.watermark.as_ref()
    }

    /// Phase 1: flow the title banner and every block into pages.
    pub fn flow_content(&self) -> Vec<Page> {
        let geometry = PageGeometry::from_config(self.config);
        let mut flow = PageFlow::new(geometry, self.watermark.as_ref());
        let renderer = BlockRenderer::new(&self.fonts, &self.config.theme, &self.config.colors);

        renderer.title_banner(&mut flow, &self.title);
        renderer.render_blocks(&mut flow, &self.blocks);
        flow.finish()
    }

    /// Phase 1 followed by phase 2: the header/footer pass over the finished
    /// page list.
    pub fn layout(&self) -> Vec<Page> {
        let mut pages = self.flow_content();
        let running = RunningText {
            title: &self.title,
            date: &self.date,
            fonts: &self.fonts,
            margins: &self.config.margins,
            colors: &self.config.colors,
        };
        stamp_pages(&mut pages, &running);
        pages
    }

    pub fn render(&self) -> Result<GeneratedPdf, Error> {
        let pages = self.layout();
        let bytes = write_pdf(&pages, &self.fonts, self.watermark.as_ref())?;
        Ok(GeneratedPdf {
            bytes,
            content_type: PDF_CONTENT_TYPE,
            filename: PDF_FILENAME,
            page_count: pages.len(),
        })
    }
}
