//! Paginated-document form of a [`Report`]: ordered, typed blocks that a
//! renderer lays onto pages.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::resolver::{Report, DISCLAIMER};

pub const DOCUMENT_TITLE: &str = "Retinal Blindness Detection Report";
pub const IMAGE_HEADING: &str = "Scanned Retinal Image:";
pub const IMAGE_UNAVAILABLE: &str = "Image not available.";
pub const DIAGNOSIS_HEADING: &str = "Diagnosis Details:";
pub const DETAILS_HEADING: &str = "Details & Recommendations:";
pub const DISCLAIMER_HEADING: &str = "Disclaimer:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Where the scan for the image section comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ImageSource {
    File { path: PathBuf },
    Unavailable { placeholder: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ReportBlock {
    Heading {
        text: String,
    },
    KeyValues {
        heading: Option<String>,
        pairs: Vec<KeyValue>,
    },
    Image {
        heading: String,
        source: ImageSource,
    },
    Paragraph {
        heading: String,
        text: String,
        indented: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub blocks: Vec<ReportBlock>,
}

impl ReportDocument {
    /// The image section's source, if the document has one.
    pub fn image_source(&self) -> Option<&ImageSource> {
        self.blocks.iter().find_map(|b| match b {
            ReportBlock::Image { source, .. } => Some(source),
            _ => None,
        })
    }

    /// True when the document embeds a scan file.
    pub fn has_embedded_image(&self) -> bool {
        matches!(self.image_source(), Some(ImageSource::File { .. }))
    }
}

/// Best-effort check: the file must exist and open for reading.
/// Any failure yields the placeholder; nothing is propagated.
pub fn locate_image(path: Option<&Path>) -> ImageSource {
    let unavailable = || ImageSource::Unavailable {
        placeholder: IMAGE_UNAVAILABLE.to_string(),
    };

    let Some(path) = path else {
        return unavailable();
    };

    if !path.is_file() {
        tracing::debug!(path = %path.display(), "report image missing");
        return unavailable();
    }

    match File::open(path) {
        Ok(_) => ImageSource::File {
            path: path.to_path_buf(),
        },
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "report image unreadable");
            unavailable()
        }
    }
}

pub(super) fn build(report: &Report) -> ReportDocument {
    let blocks = vec![
        ReportBlock::Heading {
            text: DOCUMENT_TITLE.to_string(),
        },
        ReportBlock::KeyValues {
            heading: None,
            pairs: vec![
                KeyValue::new("Patient ID", report.patient_id.clone()),
                KeyValue::new("Date", report.generated_at.clone()),
            ],
        },
        ReportBlock::Image {
            heading: IMAGE_HEADING.to_string(),
            source: locate_image(report.image_path.as_deref()),
        },
        ReportBlock::KeyValues {
            heading: Some(DIAGNOSIS_HEADING.to_string()),
            pairs: vec![
                KeyValue::new("Prediction", report.prediction_value()),
                KeyValue::new("Condition", report.title),
            ],
        },
        ReportBlock::Paragraph {
            heading: DETAILS_HEADING.to_string(),
            text: report.description.to_string(),
            indented: true,
        },
        ReportBlock::Paragraph {
            heading: DISCLAIMER_HEADING.to_string(),
            text: DISCLAIMER.to_string(),
            indented: true,
        },
    ];

    ReportDocument {
        title: DOCUMENT_TITLE.to_string(),
        blocks,
    }
}
