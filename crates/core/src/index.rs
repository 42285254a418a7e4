use crate::error::{ConfigError, EmptyIndexError};
use crate::models::{Passage, ScoredPassage};

#[derive(Debug, Clone)]
pub struct PassageIndex {
    passages: Vec<Passage>,
    dimensions: usize,
}

impl PassageIndex {
    pub fn build(passages: Vec<Passage>) -> Result<Self, EmptyIndexError> {
        let dimensions = passages
            .first()
            .map(|passage| passage.vector.len())
            .ok_or(EmptyIndexError)?;

        debug_assert!(
            passages
                .iter()
                .all(|passage| passage.vector.len() == dimensions),
            "index built with mixed vector widths"
        );

        Ok(Self {
            passages,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, ConfigError> {
        if k == 0 {
            return Err(ConfigError::InvalidTopK(k));
        }
        if query.len() != self.dimensions {
            return Err(ConfigError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut hits: Vec<ScoredPassage> = self
            .passages
            .iter()
            .map(|passage| ScoredPassage {
                score: cosine_similarity(query, &passage.vector),
                passage: passage.clone(),
            })
            .collect();

        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        hits.truncate(k);

        Ok(hits)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageLocation;

    fn passage(page: u32, chunk_index: usize, text: &str, vector: Vec<f32>) -> Passage {
        Passage {
            text: text.to_string(),
            location: PageLocation { page, chunk_index },
            vector,
        }
    }

    fn unit_index() -> PassageIndex {
        PassageIndex::build(vec![
            passage(1, 0, "east", vec![1.0, 0.0]),
            passage(1, 1, "north", vec![0.0, 1.0]),
            passage(2, 2, "northeast", vec![1.0, 1.0]),
        ])
        .expect("non-empty index")
    }

    #[test]
    fn empty_build_is_rejected() {
        assert!(PassageIndex::build(Vec::new()).is_err());
    }

    #[test]
    fn scores_are_non_increasing() {
        let index = unit_index();
        let hits = index.search(&[1.0, 0.2], 3).unwrap();

        assert_eq!(hits.len(), 3);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(hits[0].passage.text, "east");
    }

    #[test]
    fn oversized_k_returns_every_passage() {
        let index = unit_index();
        let hits = index.search(&[0.0, 1.0], 50).unwrap();
        assert_eq!(hits.len(), index.len());
    }

    #[test]
    fn zero_k_is_rejected() {
        let index = unit_index();
        assert!(matches!(
            index.search(&[1.0, 0.0], 0),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn query_width_must_match_index() {
        let index = unit_index();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 1),
            Err(ConfigError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = PassageIndex::build(vec![
            passage(1, 0, "first twin", vec![1.0, 0.0]),
            passage(1, 1, "second twin", vec![1.0, 0.0]),
            passage(1, 2, "other", vec![0.0, 1.0]),
        ])
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].passage.text, "first twin");
        assert_eq!(hits[1].passage.text, "second twin");
    }

    #[test]
    fn zero_norm_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
