use serde::Serialize;

/// Message returned to callers for any failure that is not a validation error.
pub const GENERIC_FAILURE: &str = "PDF generation failed";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required request field was absent or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The request body is not valid JSON for a generation request.
    #[error("invalid request body: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// JSON body sent back to a caller when generation does not produce a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::MissingField(_) | Error::InvalidRequest(_))
    }

    /// HTTP-style status class: 400 for caller mistakes, 500 for everything else.
    pub fn status_code(&self) -> u16 {
        if self.is_validation() { 400 } else { 500 }
    }

    /// Caller-facing body. Internal failures are logged here and replaced by a
    /// generic message so details never leak to the caller.
    pub fn response_body(&self) -> ErrorBody {
        if self.is_validation() {
            ErrorBody {
                error: self.to_string(),
            }
        } else {
            log::error!("generation failed: {self}");
            ErrorBody {
                error: GENERIC_FAILURE.to_string(),
            }
        }
    }
}
