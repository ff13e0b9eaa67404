use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no paragraphs available in {source_name}")]
    NoParagraphs { source_name: String },

    #[error("text has nothing to type")]
    EmptyText,

    #[error("unknown test duration: {label}")]
    UnknownDuration { label: String },
}
