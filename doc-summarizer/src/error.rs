use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Generation-backend call failed. Aborts the current artifact; no
    /// partial output is written.
    #[error("backend failure: {0}")]
    Backend(#[from] llm_gateway::GatewayError),

    #[error("structure error: {0}")]
    Index(#[from] structure_indexer::Error),
}

pub type Result<T> = std::result::Result<T, SummarizeError>;
