use crate::error::GenerationError;
use crate::models::{ConversationTurn, ScoredPassage, TurnRole};
use async_trait::async_trait;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a document-grounded assistant. Answer using only the \
numbered context passages below. When the passages do not contain the answer, say that the \
document does not cover it instead of guessing. Cite passages by their page number.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    pub fn flattened(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct Answerer {
    model: Arc<dyn ChatModel>,
}

impl Answerer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn answer(
        &self,
        question: &str,
        hits: &[ScoredPassage],
        history: &[ConversationTurn],
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(question, hits, history);
        let answer = self.model.complete(&prompt).await?;

        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        Ok(answer)
    }
}

pub fn build_prompt(
    question: &str,
    hits: &[ScoredPassage],
    history: &[ConversationTurn],
) -> ChatPrompt {
    let mut user = String::from("Context passages:\n");
    user.push_str(&render_context(hits));

    if !history.is_empty() {
        user.push_str("\nConversation so far:\n");
        user.push_str(&render_transcript(history));
    }

    user.push_str("\nQuestion: ");
    user.push_str(question);

    ChatPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

fn render_context(hits: &[ScoredPassage]) -> String {
    let mut context = String::new();
    for (position, hit) in hits.iter().enumerate() {
        context.push_str(&format!(
            "[{}] (page {})\n{}\n",
            position + 1,
            hit.passage.location.page,
            hit.passage.text
        ));
    }
    context
}

fn render_transcript(turns: &[ConversationTurn]) -> String {
    let mut transcript = String::new();
    for turn in turns {
        let speaker = match turn.role {
            TurnRole::User => "User",
            TurnRole::Assistant => "Assistant",
        };
        transcript.push_str(speaker);
        transcript.push_str(": ");
        transcript.push_str(&turn.text);
        transcript.push('\n');
    }
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageLocation, Passage};

    fn hit(page: u32, text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                text: text.to_string(),
                location: PageLocation {
                    page,
                    chunk_index: 0,
                },
                vector: vec![1.0],
            },
            score: 0.9,
        }
    }

    #[test]
    fn prompt_numbers_passages_and_cites_pages() {
        let hits = vec![hit(3, "pumps move fluid"), hit(7, "valves gate flow")];
        let prompt = build_prompt("what moves fluid?", &hits, &[]);

        assert!(prompt.user.contains("[1] (page 3)\npumps move fluid"));
        assert!(prompt.user.contains("[2] (page 7)\nvalves gate flow"));
        assert!(prompt.user.ends_with("Question: what moves fluid?"));
    }

    #[test]
    fn first_turn_omits_the_history_section() {
        let prompt = build_prompt("hello?", &[hit(1, "text")], &[]);
        assert!(!prompt.user.contains("Conversation so far"));
    }

    #[test]
    fn later_turns_inline_the_transcript() {
        let history = vec![
            ConversationTurn::user("what is a pump?"),
            ConversationTurn::assistant("a fluid mover"),
        ];

        let prompt = build_prompt("and a valve?", &[hit(1, "text")], &history);
        assert!(prompt.user.contains("Conversation so far:\n"));
        assert!(prompt.user.contains("User: what is a pump?"));
        assert!(prompt.user.contains("Assistant: a fluid mover"));
    }

    #[test]
    fn flattened_prompt_keeps_system_first() {
        let prompt = ChatPrompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        assert_eq!(prompt.flattened(), "sys\n\nusr");
    }

    #[tokio::test]
    async fn blank_completions_are_rejected() {
        struct BlankModel;

        #[async_trait]
        impl ChatModel for BlankModel {
            fn model_name(&self) -> &str {
                "blank"
            }

            async fn complete(&self, _prompt: &ChatPrompt) -> Result<String, GenerationError> {
                Ok("   \n".to_string())
            }
        }

        let answerer = Answerer::new(Arc::new(BlankModel));
        assert!(matches!(
            answerer.answer("why?", &[hit(1, "text")], &[]).await,
            Err(GenerationError::EmptyCompletion)
        ));
    }
}
