use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskflowError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Data integrity violation: task {task_id} has unknown status '{status}'")]
    DataIntegrity { task_id: String, status: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskflowError {
    /// Whether retrying the same operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_))
    }
}
