use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidTransition,
    DoubleImmersion,
    ImageRequestPending,
    GenerationFailed,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRejection {
    pub code: ErrorCode,
    pub intent: String,
    pub message: String,
}

impl IntentRejection {
    pub fn new(code: ErrorCode, intent: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            intent: intent.into(),
            message: message.into(),
        }
    }
}
