pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("document JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must have id \"root\", found \"{found}\"")]
    MissingRoot { found: String },

    #[error("duplicate node id in document: {id}")]
    DuplicateId { id: String },
}
