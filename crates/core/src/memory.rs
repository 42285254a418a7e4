use crate::error::ConfigError;
use crate::models::ConversationTurn;

#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
    max_turns: Option<usize>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_turns(max_turns: usize) -> Result<Self, ConfigError> {
        if max_turns < 2 {
            return Err(ConfigError::InvalidHistoryLimit(max_turns));
        }
        Ok(Self {
            turns: Vec::new(),
            max_turns: Some(max_turns),
        })
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        if let Some(cap) = self.max_turns {
            while self.turns.len() > cap {
                self.turns.remove(0);
            }
        }
    }

    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.append(ConversationTurn::user(question));
        self.append(ConversationTurn::assistant(answer));
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TurnRole;

    #[test]
    fn turns_are_kept_in_arrival_order() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("what is rust", "a systems language");
        memory.record_exchange("who makes it", "a foundation");

        let texts: Vec<&str> = memory.history().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "what is rust",
                "a systems language",
                "who makes it",
                "a foundation"
            ]
        );
        assert_eq!(memory.history()[0].role, TurnRole::User);
        assert_eq!(memory.history()[1].role, TurnRole::Assistant);
    }

    #[test]
    fn unbounded_memory_never_evicts() {
        let mut memory = ConversationMemory::new();
        for i in 0..100 {
            memory.record_exchange(&format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(memory.len(), 200);
        assert_eq!(memory.history()[0].text, "q0");
    }

    #[test]
    fn capped_memory_drops_oldest_first() {
        let mut memory = ConversationMemory::with_max_turns(4).unwrap();
        memory.record_exchange("q1", "a1");
        memory.record_exchange("q2", "a2");
        memory.record_exchange("q3", "a3");

        let texts: Vec<&str> = memory.history().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["q2", "a2", "q3", "a3"]);
    }

    #[test]
    fn cap_below_two_is_rejected() {
        assert!(ConversationMemory::with_max_turns(0).is_err());
        assert!(ConversationMemory::with_max_turns(1).is_err());
        assert!(ConversationMemory::with_max_turns(2).is_ok());
    }

    #[test]
    fn clear_empties_the_transcript() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("q", "a");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.len(), 0);
    }
}
