use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    pub page: u32,
    pub chunk_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    pub location: PageLocation,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageDraft {
    pub text: String,
    pub location: PageLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub retrieved: Vec<ScoredPassage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000,
            overlap: 100,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunking {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub max_history_turns: Option<usize>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            top_k: 3,
            max_history_turns: None,
        }
    }
}

impl ChatOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking.validate()?;
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }
        if let Some(limit) = self.max_history_turns {
            if limit < 2 {
                return Err(ConfigError::InvalidHistoryLimit(limit));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestSummary {
    pub pages: usize,
    pub passages: usize,
    pub dimensions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = ChatOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.chunking.chunk_size, 1_000);
        assert_eq!(options.chunking.overlap, 100);
        assert_eq!(options.top_k, 3);
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = ChunkingConfig {
            chunk_size: 100,
            overlap: 100,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChunking { .. })
        ));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let options = ChatOptions {
            top_k: 0,
            ..ChatOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn history_limit_below_one_pair_is_rejected() {
        let options = ChatOptions {
            max_history_turns: Some(1),
            ..ChatOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidHistoryLimit(1))
        ));
    }
}
