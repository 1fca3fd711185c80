//! Message sources: where a node's next message content comes from.
//!
//! The driver asks a [`MessageSource`] for content given the node's history
//! so far. Sources may be pure or randomized; closures work too, which keeps
//! test fakes to a single line.

use rand::{Rng, seq::SliceRandom};

use crate::message::Message;

/// Produces message content from a node's accumulated history.
pub trait MessageSource {
    /// Content for the next message of a node whose history is `history`.
    fn generate(&mut self, history: &[Message]) -> String;
}

/// A source backed by a closure.
impl<F> MessageSource for F
where
    F: FnMut(&[Message]) -> String,
{
    fn generate(&mut self, history: &[Message]) -> String {
        (self)(history)
    }
}

/// Greetings used when no vocabulary is configured.
pub const DEFAULT_VOCABULARY: [&str; 3] = ["Hello!", "Hi!", "Hey!"];

/// Picks uniformly at random from a fixed vocabulary, ignoring history.
#[derive(Debug, Clone)]
pub struct VocabularySource<R> {
    vocabulary: Vec<String>,
    rng: R,
}

impl<R: Rng> VocabularySource<R> {
    /// Source over [`DEFAULT_VOCABULARY`].
    pub fn greetings(rng: R) -> Self {
        Self::new(DEFAULT_VOCABULARY, rng)
    }

    /// Source over the given words.
    pub fn new<I, S>(vocabulary: I, rng: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { vocabulary: vocabulary.into_iter().map(Into::into).collect(), rng }
    }

    /// The words this source picks from.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

impl<R: Rng> MessageSource for VocabularySource<R> {
    /// Uniform pick; an empty vocabulary yields an empty string.
    fn generate(&mut self, _history: &[Message]) -> String {
        self.vocabulary.choose(&mut self.rng).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{env::Timestamp, id::NodeId};

    #[test]
    fn closure_is_a_source() {
        let mut source = |history: &[Message]| format!("seen {}", history.len());
        let history = [Message::new("x", NodeId::new(1), Timestamp::ZERO)];

        assert_eq!(source.generate(&[]), "seen 0");
        assert_eq!(source.generate(&history), "seen 1");
    }

    #[test]
    fn greetings_only_pick_from_vocabulary() {
        let mut source = VocabularySource::greetings(ChaCha8Rng::seed_from_u64(7));
        let picked: HashSet<_> = (0..200).map(|_| source.generate(&[])).collect();

        assert_eq!(picked.len(), 3, "200 uniform draws should hit every word");
        assert!(picked.iter().all(|word| DEFAULT_VOCABULARY.contains(&word.as_str())));
    }

    #[test]
    fn same_seed_same_words() {
        let mut first = VocabularySource::greetings(ChaCha8Rng::seed_from_u64(42));
        let mut second = VocabularySource::greetings(ChaCha8Rng::seed_from_u64(42));

        let a: Vec<_> = (0..50).map(|_| first.generate(&[])).collect();
        let b: Vec<_> = (0..50).map(|_| second.generate(&[])).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_vocabulary_yields_empty_string() {
        let mut source = VocabularySource::new(Vec::<String>::new(), ChaCha8Rng::seed_from_u64(1));
        assert_eq!(source.generate(&[]), "");
        assert!(source.vocabulary().is_empty());
    }
}
