use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use base64::Engine;
use chrono::NaiveDate;
use clap::Parser;

use richtext_pdf::{Assets, Config, Error, GenerateRequest, Session};

#[derive(Parser)]
#[command(name = "richtext-pdf", version)]
#[command(about = "Render markdown-lite text into a paginated PDF", long_about = None)]
struct Cli {
    /// Output PDF file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Document title (falls back to the configured default)
    #[arg(short, long)]
    title: Option<String>,

    /// Content file, or `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// PNG or JPEG watermark image
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// JSON request body `{ "title", "content", "logoBase64" }`; validated
    #[arg(long, value_name = "FILE", conflicts_with_all = ["title", "content", "logo"])]
    request: Option<PathBuf>,

    /// JSON configuration (page, margins, colors, theme, assets)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Footer date instead of today, as YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,
}

fn read_content(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn run(cli: &Cli) -> Result<usize, Error> {
    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let assets = Assets::load(&config.assets);
    let date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let generated = if let Some(path) = &cli.request {
        let request = GenerateRequest::from_json_str(&std::fs::read_to_string(path)?)?;
        richtext_pdf::generate_on(&request, &config, &assets, date)?
    } else {
        let mut request = GenerateRequest::new(
            cli.title.clone().unwrap_or_default(),
            match &cli.content {
                Some(path) => read_content(path)?,
                None => String::new(),
            },
        );
        if let Some(logo) = &cli.logo {
            let bytes = std::fs::read(logo)?;
            request = request.with_logo(base64::engine::general_purpose::STANDARD.encode(bytes));
        }
        Session::new(&request, &config, &assets, date).render()?
    };

    std::fs::write(&cli.output, &generated.bytes)?;
    Ok(generated.page_count)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(pages) => {
            log::info!("wrote {} ({pages} pages)", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let body = e.response_body();
            log::debug!("status {}", e.status_code());
            eprintln!(
                "{}",
                serde_json::to_string(&body).unwrap_or_else(|_| body.error.clone())
            );
            ExitCode::FAILURE
        }
    }
}
