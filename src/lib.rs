pub mod assets;
pub mod config;
mod error;
pub mod fonts;
pub mod markup;
pub mod model;
pub mod pdf;
pub mod session;

pub use assets::Assets;
pub use config::Config;
pub use error::{Error, ErrorBody, GENERIC_FAILURE};
pub use markup::{parse_rich_text, split_styled_runs};
pub use model::{Block, GenerateRequest, GeneratedPdf, RunStyle, StyledRun};
pub use pdf::layout::wrap_line;
pub use session::Session;

use std::time::Instant;

use chrono::NaiveDate;

/// Validate `request` and render it, stamping today's local date.
pub fn generate(request: &GenerateRequest, config: &Config, assets: &Assets) -> Result<GeneratedPdf, Error> {
    generate_on(request, config, assets, chrono::Local::now().date_naive())
}

/// Like [`generate`] with an explicit footer date.
pub fn generate_on(
    request: &GenerateRequest,
    config: &Config,
    assets: &Assets,
    date: NaiveDate,
) -> Result<GeneratedPdf, Error> {
    request.validate()?;
    let t0 = Instant::now();

    let session = Session::new(request, config, assets, date);
    let t_prepare = t0.elapsed();

    let generated = session.render()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: prepare={:.1}ms, render={:.1}ms, total={:.1}ms ({} blocks, {} pages, {} bytes, watermark={})",
        t_prepare.as_secs_f64() * 1000.0,
        (t_total - t_prepare).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        session.blocks().len(),
        generated.page_count,
        generated.bytes.len(),
        session.watermark().is_some(),
    );

    Ok(generated)
}
