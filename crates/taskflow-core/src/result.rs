use crate::error::TaskflowError;

pub type TaskflowResult<T> = Result<T, TaskflowError>;
