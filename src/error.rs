pub type PartanimResult<T> = Result<T, PartanimError>;

#[derive(thiserror::Error, Debug)]
pub enum PartanimError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("contract error: {0}")]
    Contract(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PartanimError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Referential-integrity failures: an upstream collaborator broke its
    /// data contract (e.g. a cluster with no colored primary member).
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }
}
