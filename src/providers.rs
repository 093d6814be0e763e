//! Collaborators the screening workflow calls out to.
//!
//! - PredictionProvider: grades a retinal image (model lives outside this crate)
//! - Notifier: fire-and-forget announcement of a new result

use std::path::Path;

use thiserror::Error;

use crate::models::{Prediction, SeverityCode};

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Image could not be read: {0}")]
    UnreadableImage(String),

    #[error("Model failed: {0}")]
    Model(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Grades a retinal image into a severity code and class label.
pub trait PredictionProvider {
    fn predict(&self, image_path: &Path) -> Result<Prediction, PredictionError>;
}

/// Announces a new result. Callers log failures and carry on.
pub trait Notifier {
    fn notify(&self, severity: SeverityCode, class_name: &str) -> Result<(), NotifyError>;
}

/// Message body sent for a new result.
pub fn notification_body(severity: SeverityCode, class_name: &str) -> String {
    format!("Blindness detection system report! severity level is : {severity} and class is {class_name}")
}

/// Notifier that writes the message to the log instead of a device.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: SeverityCode, class_name: &str) -> Result<(), NotifyError> {
        tracing::info!(
            severity = severity.value(),
            class_name,
            body = %notification_body(severity, class_name),
            "result notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_severity_and_class() {
        assert_eq!(
            notification_body(SeverityCode(2), "Moderate"),
            "Blindness detection system report! severity level is : 2 and class is Moderate"
        );
    }

    #[test]
    fn log_notifier_never_fails() {
        assert!(LogNotifier.notify(SeverityCode(9), "Unknown").is_ok());
    }

    #[test]
    fn errors_render_messages() {
        let err = PredictionError::UnreadableImage("scan.png".into());
        assert_eq!(err.to_string(), "Image could not be read: scan.png");
        let err = NotifyError::Delivery("timeout".into());
        assert!(err.to_string().contains("timeout"));
    }
}
