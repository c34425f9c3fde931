use shared::{
    domain::{BathType, Stage},
    error::{ErrorCode, IntentRejection},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DarkroomError {
    #[error("{intent} is not allowed during {stage}: {reason}")]
    InvalidTransition {
        intent: &'static str,
        stage: Stage,
        reason: &'static str,
    },
    #[error("paper is already in the {current} tray; remove it before placing it in the {requested} tray")]
    DoubleImmersion {
        current: BathType,
        requested: BathType,
    },
    #[error("an image request is already pending for this session")]
    ImageRequestPending,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DarkroomError {
    pub(crate) fn invalid(intent: &'static str, stage: Stage, reason: &'static str) -> Self {
        DarkroomError::InvalidTransition {
            intent,
            stage,
            reason,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DarkroomError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            DarkroomError::DoubleImmersion { .. } => ErrorCode::DoubleImmersion,
            DarkroomError::ImageRequestPending => ErrorCode::ImageRequestPending,
            DarkroomError::Store(_) => ErrorCode::Internal,
        }
    }

    pub fn rejection(&self, intent: &str) -> IntentRejection {
        IntentRejection::new(self.code(), intent, self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie within [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("elapsed time for {bath} cannot decrease from {from}s to {to}s")]
    CounterDecrease { bath: BathType, from: f64, to: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("image provider unreachable: {0}")]
    Transport(String),
    #[error("image provider answered with status {0}")]
    Status(u16),
    #[error("malformed image provider response: {0}")]
    Malformed(String),
    #[error("no image provider configured")]
    Unavailable,
}
