use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::DrStage;
use super::severity::SeverityCode;

/// Raw output of the grading model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub severity: SeverityCode,
    pub class_name: String,
}

/// Everything known about the most recent prediction for a patient.
/// Built once per prediction event and replaced, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionContext {
    severity: SeverityCode,
    class_name: String,
    patient_id: String,
    image_path: Option<PathBuf>,
}

impl PredictionContext {
    pub fn new(
        prediction: Prediction,
        patient_id: impl Into<String>,
        image_path: Option<PathBuf>,
    ) -> Self {
        Self {
            severity: prediction.severity,
            class_name: prediction.class_name,
            patient_id: patient_id.into(),
            image_path,
        }
    }

    pub fn severity(&self) -> SeverityCode {
        self.severity
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// The slice of this prediction the assistant is allowed to see.
    pub fn chat_context(&self) -> ChatContext {
        ChatContext {
            class_name: self.class_name.clone(),
        }
    }
}

/// Last-diagnosis context handed to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub class_name: String,
}

impl ChatContext {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    /// Parsed stage, if the class name is one the model emits.
    pub fn stage(&self) -> Option<DrStage> {
        self.class_name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moderate() -> Prediction {
        Prediction {
            severity: SeverityCode(2),
            class_name: "Moderate".into(),
        }
    }

    #[test]
    fn context_carries_prediction_fields() {
        let ctx = PredictionContext::new(moderate(), "alice", Some(PathBuf::from("/scans/a.png")));
        assert_eq!(ctx.severity(), SeverityCode(2));
        assert_eq!(ctx.class_name(), "Moderate");
        assert_eq!(ctx.patient_id(), "alice");
        assert_eq!(ctx.image_path(), Some(Path::new("/scans/a.png")));
    }

    #[test]
    fn chat_context_projects_class_only() {
        let ctx = PredictionContext::new(moderate(), "alice", None);
        assert_eq!(ctx.chat_context(), ChatContext::new("Moderate"));
    }

    #[test]
    fn chat_context_stage_parsing() {
        assert_eq!(ChatContext::new("No DR").stage(), Some(DrStage::NoDr));
        assert_eq!(ChatContext::new("Proliferative DR").stage(), Some(DrStage::Proliferative));
        assert_eq!(ChatContext::new("Unknown").stage(), None);
    }
}
