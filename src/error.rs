use thiserror::Error;

use crate::models::{ModuleId, ScenarioId, UserId};

pub type Result<T> = std::result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("module not found: {0}")]
    ModuleNotFound(ModuleId),

    #[error("scenario not found: {0}")]
    ScenarioNotFound(ScenarioId),

    #[error("student not found: {0}")]
    StudentNotFound(UserId),

    #[error("access denied for user {0}")]
    AccessDenied(UserId),

    #[error("completion percentage must be within 0-100, got {0}")]
    InvalidPercentage(f64),

    #[error("quiz score must be within 0-100, got {0}")]
    InvalidScore(f64),

    #[error("module {module} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        module: ModuleId,
        prerequisite: ModuleId,
    },

    #[error("ethics score must be within 0-{max}, got {0}", max = crate::models::MAX_ETHICS_SCORE)]
    InvalidEthicsScore(u8),

    #[error("record stored under {key} carries id {id}")]
    KeyMismatch { key: uuid::Uuid, id: uuid::Uuid },

    #[error("prerequisite cycle through module {0}")]
    PrerequisiteCycle(ModuleId),

    #[error("id already registered: {0}")]
    DuplicateId(uuid::Uuid),

    #[error("module {0} has no assessment questions")]
    NoAssessment(ModuleId),

    #[error("expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PlatformError::UserNotFound(_)
                | PlatformError::ModuleNotFound(_)
                | PlatformError::ScenarioNotFound(_)
                | PlatformError::StudentNotFound(_)
        )
    }
}
