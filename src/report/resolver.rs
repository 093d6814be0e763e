use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{PredictionContext, ReportEntry, SeverityCode};

use super::document::{self, ReportDocument};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DISCLAIMER: &str = "This report is generated by an automated system and is not a substitute for a professional medical diagnosis. \
Consult with a qualified ophthalmologist or healthcare provider for a complete evaluation and treatment plan.";

/// Shown in place of a report before any image has been graded.
pub const NO_PREDICTION_NOTICE: &str =
    "No prediction has been made yet. Please go back and upload an image.";

/// Resolved diagnosis report. Pure data: rendering it to text or to a
/// document never touches the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub patient_id: String,
    pub generated_at: String,
    pub class_name: String,
    pub severity: SeverityCode,
    pub title: &'static str,
    pub description: &'static str,
    pub image_path: Option<std::path::PathBuf>,
}

/// Resolve a severity code into a report. Any integer is accepted.
pub fn resolve(
    severity: i64,
    patient_id: &str,
    class_name: &str,
    timestamp: NaiveDateTime,
    image_path: Option<&std::path::Path>,
) -> Report {
    let severity = SeverityCode(severity);
    let ReportEntry { title, description } = *severity.entry();

    Report {
        patient_id: patient_id.to_string(),
        generated_at: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        class_name: class_name.to_string(),
        severity,
        title,
        description,
        image_path: image_path.map(|p| p.to_path_buf()),
    }
}

/// Resolve the report for a stored prediction.
pub fn resolve_context(ctx: &PredictionContext, timestamp: NaiveDateTime) -> Report {
    resolve(
        ctx.severity().value(),
        ctx.patient_id(),
        ctx.class_name(),
        timestamp,
        ctx.image_path(),
    )
}

impl Report {
    /// Plain-text rendition shown on the report screen.
    pub fn to_text(&self) -> String {
        format!(
            "--- RETINAL BLINDNESS DETECTION REPORT ---\n\n\
             Patient ID: {patient}\n\
             Date: {date}\n\n\
             --- DIAGNOSIS ---\n\
             {prediction}\n\
             Condition: {title}\n\n\
             --- DETAILS & RECOMMENDATIONS ---\n\
             {description}\n\n\
             --- DISCLAIMER ---\n\
             {DISCLAIMER}\n",
            patient = self.patient_id,
            date = self.generated_at,
            prediction = self.prediction_line(),
            title = self.title,
            description = self.description,
        )
    }

    /// Paginated-document rendition. Checks `image_path` once.
    pub fn to_document(&self) -> ReportDocument {
        document::build(self)
    }

    pub(crate) fn prediction_line(&self) -> String {
        format!("Prediction: {}", self.prediction_value())
    }

    pub(crate) fn prediction_value(&self) -> String {
        format!("{} (Severity Level: {})", self.class_name, self.severity)
    }
}
