use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed cleaning plan: {0}")]
    MalformedPlan(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
