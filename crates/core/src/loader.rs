use crate::error::LoadError;
use lopdf::Document;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<PageText>, LoadError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<PageText>, LoadError> {
        fs::metadata(path)?;

        let document =
            Document::load(path).map_err(|error| LoadError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| LoadError::PdfParse(error.to_string()))?;

            if !text.trim().is_empty() {
                pages.push(PageText {
                    number: page_no,
                    text,
                });
            }
        }

        if pages.is_empty() {
            return Err(LoadError::NoText(path.display().to_string()));
        }

        Ok(pages)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load(&self, path: &Path) -> Result<Vec<PageText>, LoadError> {
        let text = fs::read_to_string(path)?;

        if text.trim().is_empty() {
            return Err(LoadError::NoText(path.display().to_string()));
        }

        Ok(vec![PageText { number: 1, text }])
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Vec<PageText>, LoadError> {
        load_document(path)
    }
}

pub fn load_document(path: &Path) -> Result<Vec<PageText>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => PdfLoader.load(path),
        "txt" | "md" | "markdown" => PlainTextLoader.load(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}
