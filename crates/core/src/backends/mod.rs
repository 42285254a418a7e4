pub mod groq;
pub mod ollama;

pub use groq::GroqBackend;
pub use ollama::OllamaBackend;
