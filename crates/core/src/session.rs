use crate::chunking::split_passages;
use crate::embeddings::Embedder;
use crate::error::{AskError, ConfigError, IngestError};
use crate::generation::{Answerer, ChatModel};
use crate::index::PassageIndex;
use crate::loader::{DocumentLoader, FileLoader, PageText};
use crate::memory::ConversationMemory;
use crate::models::{
    ChatOptions, ConversationTurn, DocumentFingerprint, IngestSummary, Passage, QueryResult,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

struct ActiveDocument {
    fingerprint: DocumentFingerprint,
    index: PassageIndex,
}

pub struct ChatSession {
    session_id: Uuid,
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn Embedder>,
    answerer: Answerer,
    options: ChatOptions,
    document: Option<ActiveDocument>,
    memory: ConversationMemory,
}

impl ChatSession {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chat_model: Arc<dyn ChatModel>,
        options: ChatOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;

        let memory = match options.max_history_turns {
            Some(limit) => ConversationMemory::with_max_turns(limit)?,
            None => ConversationMemory::new(),
        };

        Ok(Self {
            session_id: Uuid::new_v4(),
            loader: Arc::new(FileLoader),
            embedder,
            answerer: Answerer::new(chat_model),
            options,
            document: None,
            memory,
        })
    }

    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_ready(&self) -> bool {
        self.document.is_some()
    }

    pub fn fingerprint(&self) -> Option<&DocumentFingerprint> {
        self.document.as_ref().map(|doc| &doc.fingerprint)
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.memory.history()
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    pub fn model_name(&self) -> &str {
        self.answerer.model_name()
    }

    pub async fn ingest(&mut self, path: &Path) -> Result<IngestSummary, IngestError> {
        let pages = self.loader.load(path)?;
        let mut drafts = split_passages(&pages, self.options.chunking)?;
        drafts.retain(|draft| !draft.text.trim().is_empty());

        let texts: Vec<String> = drafts.iter().map(|draft| draft.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let passages: Vec<Passage> = drafts
            .into_iter()
            .zip(vectors)
            .map(|(draft, vector)| Passage {
                text: draft.text,
                location: draft.location,
                vector,
            })
            .collect();

        let index = PassageIndex::build(passages)?;
        let summary = IngestSummary {
            pages: pages.len(),
            passages: index.len(),
            dimensions: index.dimensions(),
        };
        let fingerprint = fingerprint_for(path, &pages);

        self.document = Some(ActiveDocument { fingerprint, index });
        self.memory.clear();

        Ok(summary)
    }

    pub async fn ask(&mut self, question: &str) -> Result<QueryResult, AskError> {
        let document = self.document.as_ref().ok_or(AskError::NotReady)?;

        let query = self.embedder.embed(question).await?;
        let hits = document.index.search(&query, self.options.top_k)?;
        let answer = self
            .answerer
            .answer(question, &hits, self.memory.history())
            .await?;

        self.memory.record_exchange(question, &answer);

        Ok(QueryResult {
            answer,
            retrieved: hits,
        })
    }

    pub fn reset(&mut self) {
        self.document = None;
        self.memory.clear();
    }
}

fn fingerprint_for(path: &Path, pages: &[PageText]) -> DocumentFingerprint {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(page.number.to_be_bytes());
        hasher.update(page.text.as_bytes());
    }

    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    DocumentFingerprint {
        title,
        source_path: path.display().to_string(),
        checksum: format!("{:x}", hasher.finalize()),
        ingested_at: Utc::now(),
    }
}
