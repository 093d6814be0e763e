pub mod chat;
pub mod enums;
pub mod prediction;
pub mod severity;

pub use chat::ChatTurn;
pub use enums::{Disease, DrStage, Speaker};
pub use prediction::{ChatContext, Prediction, PredictionContext};
pub use severity::{ReportEntry, SeverityCode};
