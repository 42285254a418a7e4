pub mod backends;
pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod memory;
pub mod models;
pub mod session;

pub use backends::{GroqBackend, OllamaBackend};
pub use chunking::split_passages;
pub use embeddings::{CharacterNgramEmbedder, Embedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{
    AskError, ConfigError, EmbeddingError, EmptyIndexError, GenerationError, IngestError,
    LoadError,
};
pub use generation::{build_prompt, Answerer, ChatModel, ChatPrompt};
pub use index::{cosine_similarity, PassageIndex};
pub use loader::{load_document, DocumentLoader, FileLoader, PageText, PdfLoader, PlainTextLoader};
pub use memory::ConversationMemory;
pub use models::{
    ChatOptions, ChunkingConfig, ConversationTurn, DocumentFingerprint, IngestSummary,
    PageLocation, Passage, PassageDraft, QueryResult, ScoredPassage, TurnRole,
};
pub use session::ChatSession;
