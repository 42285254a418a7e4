use crate::error::ConfigError;
use crate::loader::PageText;
use crate::models::{ChunkingConfig, PageLocation, PassageDraft};

pub fn split_passages(
    pages: &[PageText],
    config: ChunkingConfig,
) -> Result<Vec<PassageDraft>, ConfigError> {
    config.validate()?;

    let mut drafts = Vec::new();
    for page in pages {
        for text in window_text(&page.text, config) {
            let location = PageLocation {
                page: page.number,
                chunk_index: drafts.len(),
            };
            drafts.push(PassageDraft { text, location });
        }
    }

    Ok(drafts)
}

fn window_text(text: &str, config: ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    // overlap < chunk_size is validated upstream, so the step is positive.
    let step = config.chunk_size - config.overlap;
    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + config.chunk_size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    windows
}
