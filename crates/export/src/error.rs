use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("font loading failed: {0}")]
    Font(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for ExportError {
    fn from(e: printpdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}
