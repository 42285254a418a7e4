use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pdf_chat_core::{
    CharacterNgramEmbedder, ChatModel, ChatOptions, ChatSession, ChunkingConfig, Embedder,
    GroqBackend, OllamaBackend, QueryResult, ScoredPassage,
};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-chat", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chat backend that writes the answers.
    #[arg(long, value_enum, default_value_t = LlmChoice::Groq)]
    llm: LlmChoice,

    /// Embedding backend for passages and questions.
    #[arg(long, value_enum, default_value_t = EmbedderChoice::Ngram)]
    embedder: EmbedderChoice,

    /// Groq chat model
    #[arg(long, default_value = "llama3-70b-8192")]
    groq_model: String,

    /// Ollama base URL
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Passage size in characters
    #[arg(long, default_value = "1000")]
    chunk_size: usize,

    /// Overlap between consecutive passages in characters
    #[arg(long, default_value = "100")]
    overlap: usize,

    /// Passages retrieved per question
    #[arg(long, default_value = "3")]
    top_k: usize,

    /// Conversation turns kept for prompting; 0 keeps everything
    #[arg(long, default_value = "32")]
    max_history_turns: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum LlmChoice {
    Groq,
    Ollama,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbedderChoice {
    Ngram,
    Ollama,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a document and answer a single question.
    Ask {
        /// Path to the source document (pdf, txt or md).
        #[arg(long)]
        document: String,
        /// Question to answer
        #[arg(long)]
        question: String,
    },
    /// Ingest a document and chat over it interactively.
    Chat {
        /// Path to the source document (pdf, txt or md).
        #[arg(long)]
        document: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let options = ChatOptions {
        chunking: ChunkingConfig {
            chunk_size: cli.chunk_size,
            overlap: cli.overlap,
        },
        top_k: cli.top_k,
        max_history_turns: match cli.max_history_turns {
            0 => None,
            limit => Some(limit),
        },
    };

    let embedder: Arc<dyn Embedder> = match cli.embedder {
        EmbedderChoice::Ngram => Arc::new(CharacterNgramEmbedder::default()),
        EmbedderChoice::Ollama => Arc::new(OllamaBackend::new(&cli.ollama_url)),
    };

    let chat_model: Arc<dyn ChatModel> = match cli.llm {
        LlmChoice::Groq => {
            let backend = GroqBackend::from_env()
                .map_err(|error| anyhow::anyhow!(error.to_string()))?
                .with_model(&cli.groq_model);
            Arc::new(backend)
        }
        LlmChoice::Ollama => Arc::new(OllamaBackend::new(&cli.ollama_url)),
    };

    let mut session = ChatSession::new(embedder, chat_model, options)
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    info!(
        version = app_version,
        session = %session.id(),
        model = session.model_name(),
        started_at = %Utc::now().to_rfc3339(),
        "pdf-chat boot"
    );

    match cli.command {
        Command::Ask { document, question } => {
            ingest_document(&mut session, &document).await?;

            let result = session
                .ask(&question)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            print_answer(&result);
        }
        Command::Chat { document } => {
            ingest_document(&mut session, &document).await?;
            run_chat_loop(&mut session, &document).await?;
        }
    }

    Ok(())
}

async fn ingest_document(session: &mut ChatSession, document: &str) -> anyhow::Result<()> {
    let path = Path::new(document);
    info!(path = %path.display(), "ingesting document");

    let summary = session
        .ingest(path)
        .await
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    if let Some(fingerprint) = session.fingerprint() {
        info!(checksum = %fingerprint.checksum, passages = summary.passages, "document indexed");
        println!(
            "Document '{}' is ready: {} page(s), {} passage(s), {}-dim vectors",
            fingerprint.title, summary.pages, summary.passages, summary.dimensions
        );
    }

    Ok(())
}

fn print_answer(result: &QueryResult) {
    println!("answer:\n{}\n", result.answer);
    for hit in &result.retrieved {
        println!(
            "[page {}] score={:.4}",
            hit.passage.location.page, hit.score
        );
        println!("  {}", snippet(&hit.passage.text));
    }
}

async fn run_chat_loop(session: &mut ChatSession, document: &str) -> anyhow::Result<()> {
    println!("Ask about the document. 'exit' leaves, ':reset' starts the conversation over.");

    let mut input = String::new();

    loop {
        print!("you> ");
        io::stdout().flush()?;

        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let question = input.trim();
        if question.is_empty() {
            continue;
        }
        match question {
            "exit" | "quit" => break,
            ":reset" => {
                session.reset();
                ingest_document(session, document).await?;
                println!("conversation cleared");
                continue;
            }
            _ => {}
        }

        match session.ask(question).await {
            Ok(result) => {
                println!("\n{}\n", result.answer);

                let pages = cited_pages(&result.retrieved);
                let rendered: Vec<String> = pages.iter().map(|page| page.to_string()).collect();
                println!("(from pages {})", rendered.join(", "));
            }
            Err(error) => {
                warn!(%error, "turn failed");
                println!("error: {error}");
            }
        }
    }

    Ok(())
}

fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 160;

    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= MAX_CHARS {
        flattened
    } else {
        let head: String = flattened.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}

fn cited_pages(hits: &[ScoredPassage]) -> Vec<u32> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut pages: Vec<u32> = Vec::new();
    for hit in hits {
        if seen.insert(hit.passage.location.page) {
            pages.push(hit.passage.location.page);
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_chat_core::{PageLocation, Passage};

    fn hit(page: u32, chunk_index: usize) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                text: String::new(),
                location: PageLocation { page, chunk_index },
                vector: Vec::new(),
            },
            score: 0.0,
        }
    }

    #[test]
    fn cited_pages_lists_each_page_once_in_retrieval_order() {
        let hits = vec![hit(2, 0), hit(1, 1), hit(2, 2)];
        assert_eq!(cited_pages(&hits), vec![2, 1]);
    }

    #[test]
    fn cited_pages_of_no_hits_is_empty() {
        assert!(cited_pages(&[]).is_empty());
    }
}
