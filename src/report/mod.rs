//! Severity report resolution: severity code → condition text, rendered as a
//! plain-text report or a block document, and exported as PDF.

pub mod document;
pub mod pdf;
pub mod resolver;

pub use document::{ImageSource, KeyValue, ReportBlock, ReportDocument};
pub use pdf::{export_pdf_to_file, PdfRenderer};
pub use resolver::{resolve, resolve_context, Report, DISCLAIMER, NO_PREDICTION_NOTICE};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lays a report document onto pages.
pub trait DocumentRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError>;
}
