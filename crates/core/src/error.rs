use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("no extractable text in {0}")]
    NoText(String),

    #[error("unsupported document extension: {0}")]
    UnsupportedExtension(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chunking config: overlap {overlap} must be smaller than chunk size {chunk_size}")]
    InvalidChunking { chunk_size: usize, overlap: usize },

    #[error("top_k must be at least 1, got {0}")]
    InvalidTopK(usize),

    #[error("history limit must keep at least one question/answer pair, got {0}")]
    InvalidHistoryLimit(usize),

    #[error("query vector has {actual} dimensions, index stores {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    Backend { backend: String, details: String },

    #[error("embedding dimension drifted: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
#[error("cannot build an index from zero passages")]
pub struct EmptyIndexError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    Backend { backend: String, details: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document loading failed: {0}")]
    Load(#[from] LoadError),

    #[error("pipeline configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("embedding stage failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index build failed: {0}")]
    EmptyIndex(#[from] EmptyIndexError),
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("no document has been ingested yet")]
    NotReady,

    #[error("invalid query parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("embedding the question failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
